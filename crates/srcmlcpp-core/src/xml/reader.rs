//! srcML document reader built on `quick-xml`.

use std::rc::Rc;

use log::trace;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use super::{XmlError, XmlNode};

/// Parse a complete srcML document and return its root element.
///
/// Whitespace is preserved verbatim: it is part of the source code srcML
/// round-trips. XML declarations, comments and processing instructions are
/// skipped.
pub fn parse_document(input: &str) -> Result<XmlNode, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        let event = reader.read_event().map_err(|e| XmlError::Syntax {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        match event {
            Event::Start(e) => stack.push(start_node(&e)?),
            Event::Empty(e) => {
                let node = start_node(&e)?;
                attach(&mut stack, &mut root, node);
            }
            Event::End(e) => {
                let node = stack.pop().ok_or_else(|| {
                    XmlError::UnbalancedClose(String::from_utf8_lossy(e.name().as_ref()).into_owned())
                })?;
                attach(&mut stack, &mut root, node);
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| XmlError::Syntax {
                    position: reader.buffer_position() as u64,
                    message: err.to_string(),
                })?;
                append_text(&mut stack, &text);
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                append_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Syntax {
            position: reader.buffer_position() as u64,
            message: format!("unclosed element `{}`", open.name()),
        });
    }

    let root = root.ok_or(XmlError::NoRoot)?;
    trace!(root = root.name(); "Parsed srcML document");
    Ok(root)
}

fn start_node(e: &BytesStart<'_>) -> Result<XmlNode, XmlError> {
    let mut node = XmlNode::new(String::from_utf8_lossy(e.name().as_ref()).into_owned());
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::Syntax {
            position: 0,
            message: err.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Syntax {
                position: 0,
                message: err.to_string(),
            })?
            .into_owned();
        node.set_attribute(key, value);
    }
    Ok(node)
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.push_child(Rc::new(node)),
        None => *root = Some(node),
    }
}

/// Text goes to the tail of the last closed child, or to the open element's text.
fn append_text(stack: &mut [XmlNode], text: &str) {
    let Some(parent) = stack.last_mut() else {
        // Whitespace around the root element.
        return;
    };
    let mut children = std::mem::take(&mut parent.children);
    match children.last_mut() {
        Some(last) => {
            let last = Rc::make_mut(last);
            let tail = last.tail.get_or_insert_with(String::new);
            tail.push_str(text);
        }
        None => {
            let own = parent.text.get_or_insert_with(String::new);
            own.push_str(text);
        }
    }
    parent.children = children;
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<unit xmlns="http://www.srcML.org/srcML/src" xmlns:cpp="http://www.srcML.org/srcML/cpp" xmlns:pos="http://www.srcML.org/srcML/position" revision="1.0.0" language="C++" pos:tabs="8"><decl_stmt pos:start="1:1" pos:end="1:10"><decl><type><name pos:start="1:1" pos:end="1:3">int</name></type> <name pos:start="1:5" pos:end="1:5">a</name> <init pos:start="1:7" pos:end="1:9">= <expr><literal type="number">1</literal></expr></init></decl>;</decl_stmt>
<cpp:define>#<cpp:directive>define</cpp:directive> <cpp:macro><name>A</name></cpp:macro> <cpp:value>(1 &lt; 2)</cpp:value></cpp:define>
</unit>
"#;

    #[test]
    fn test_parse_unit_structure() {
        let unit = parse_document(UNIT).unwrap();
        assert_eq!(unit.tag(), "unit");
        assert_eq!(unit.attribute("language"), Some("C++"));
        assert_eq!(unit.children().len(), 2);
        assert_eq!(unit.children()[0].tag(), "decl_stmt");
        assert_eq!(unit.children()[1].name(), "cpp:define");
    }

    #[test]
    fn test_parse_preserves_source() {
        let unit = parse_document(UNIT).unwrap();
        assert_eq!(unit.verbatim(), "int a = 1;\n#define A (1 < 2)\n");
    }

    #[test]
    fn test_parse_positions() {
        let unit = parse_document(UNIT).unwrap();
        let decl_stmt = &unit.children()[0];
        assert_eq!(decl_stmt.start().map(|p| p.line()), Some(1));
        assert_eq!(decl_stmt.end().map(|p| p.column()), Some(10));
    }

    #[test]
    fn test_parse_empty_element() {
        let unit = parse_document(r#"<unit><type ref="prev"/></unit>"#).unwrap();
        assert_eq!(unit.children()[0].attribute("ref"), Some("prev"));
        assert_eq!(unit.children()[0].text(), None);
    }

    #[test]
    fn test_parse_unbalanced() {
        assert!(parse_document("<unit><decl></unit>").is_err());
        assert!(matches!(parse_document(""), Err(XmlError::NoRoot)));
    }
}
