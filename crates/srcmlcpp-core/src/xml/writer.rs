//! srcML document writer built on `quick-xml`.

use std::io::Cursor;

use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};

use super::{XmlError, XmlNode};

/// Render `node` as an XML string.
///
/// Elements other than `<unit>` are first embedded into a srcML unit (see
/// [`XmlNode::embed_into_unit`]) so that the output is a valid srcML document.
pub fn to_xml_string(node: &XmlNode) -> Result<String, XmlError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    write_node(&mut writer, &node.embed_into_unit(), false)?;
    into_string(writer)
}

/// Render `node` as an indented XML string, for human inspection.
///
/// The indentation alters the text content, so the result is not a faithful
/// srcML document anymore.
pub fn to_pretty_xml_string(node: &XmlNode) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 3);
    write_node(&mut writer, node, true)?;
    into_string(writer)
}

fn into_string(writer: Writer<Cursor<Vec<u8>>>) -> Result<String, XmlError> {
    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| XmlError::Write(e.to_string()))
}

fn write_node<W: std::io::Write>(
    writer: &mut Writer<W>,
    node: &XmlNode,
    pretty: bool,
) -> Result<(), XmlError> {
    let mut start = BytesStart::new(node.name());
    for (key, value) in node.attributes() {
        start.push_attribute((key, value));
    }

    let text = node.text().filter(|t| !pretty || !t.trim().is_empty());
    if text.is_none() && node.children().is_empty() {
        emit(writer, Event::Empty(start))?;
    } else {
        emit(writer, Event::Start(start))?;
        if let Some(text) = text {
            let text = if pretty { text.trim() } else { text };
            emit(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in node.children() {
            write_node(writer, child, pretty)?;
        }
        emit(writer, Event::End(BytesEnd::new(node.name())))?;
    }

    if let Some(tail) = node.tail() {
        if !pretty {
            emit(writer, Event::Text(BytesText::new(tail)))?;
        } else if !tail.trim().is_empty() {
            emit(writer, Event::Text(BytesText::new(tail.trim())))?;
        }
    }
    Ok(())
}

fn emit<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<(), XmlError> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_document;

    #[test]
    fn test_single_element_is_embedded_into_unit() {
        let node = XmlNode::new("name").with_text("a < b").with_tail("\n");
        let xml = to_xml_string(&node).unwrap();
        assert!(xml.starts_with("<unit xmlns=\"http://www.srcML.org/srcML/src\""));
        assert!(xml.contains("<name>a &lt; b</name></unit>"));
    }

    #[test]
    fn test_write_then_read_preserves_source() {
        let source = r#"<unit xmlns="http://www.srcML.org/srcML/src" revision="1.0.0" language="C++"><decl_stmt><decl><type><name>int</name></type> <name>a</name></decl>;</decl_stmt>
<comment type="line">// hi</comment>
</unit>"#;
        let unit = parse_document(source).unwrap();
        let written = to_xml_string(&unit).unwrap();
        let reread = parse_document(&written).unwrap();
        assert_eq!(reread.verbatim(), "int a;\n// hi\n");
        assert_eq!(reread, unit);
    }

    #[test]
    fn test_pretty_output_is_indented() {
        let node = XmlNode::new("decl")
            .with_child(XmlNode::new("name").with_text("a"))
            .with_child(XmlNode::new("init"));
        let xml = to_pretty_xml_string(&node).unwrap();
        assert!(xml.contains("\n   <name>a</name>"));
        assert!(xml.contains("\n   <init/>"));
    }
}
