use proptest::prelude::*;

use srcmlcpp_core::{
    XmlNode,
    xml::{parse_document, to_xml_string},
};

/// Source fragments with characters that need escaping in XML.
fn source_fragment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_ <>&\"'=;:(){}\n]{0,40}"
}

fn check_text_survives_write_and_read(text: &str, tail: &str) -> Result<(), TestCaseError> {
    let node = XmlNode::new("unit")
        .with_attribute("language", "C++")
        .with_child(XmlNode::new("comment").with_text(text).with_tail(tail));
    let xml = to_xml_string(&node).map_err(|e| TestCaseError::fail(e.to_string()))?;
    let reread = parse_document(&xml).map_err(|e| TestCaseError::fail(e.to_string()))?;

    prop_assert_eq!(reread.verbatim(), format!("{text}{tail}"));
    Ok(())
}

proptest! {
    #[test]
    fn text_survives_write_and_read(
        text in source_fragment_strategy(),
        tail in source_fragment_strategy(),
    ) {
        check_text_survives_write_and_read(&text, &tail)?;
    }
}

#[test]
fn test_nested_unit_document() {
    let xml = r#"<unit xmlns="http://www.srcML.org/srcML/src" xmlns:pos="http://www.srcML.org/srcML/position"><namespace pos:start="1:1" pos:end="1:20">namespace <name>N</name> <block>{<struct>struct <name>S</name><block>{<public type="default"/>}</block>;</struct>}</block></namespace>
</unit>"#;
    let unit = parse_document(xml).unwrap();
    let namespace = &unit.children()[0];
    assert_eq!(namespace.tag(), "namespace");
    assert_eq!(namespace.verbatim(), "namespace N {struct S{};}");
    let block = namespace.child_with_tag("block").unwrap();
    assert_eq!(block.child_with_tag("struct").unwrap().verbatim(), "struct S{};");
}
