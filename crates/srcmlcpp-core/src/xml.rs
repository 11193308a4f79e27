//! In-memory model of a srcML document.
//!
//! srcML markup is lossless: concatenating every text fragment of a tree in
//! document order gives back the original source code. [`XmlNode`] keeps the
//! ElementTree-like `text` / `tail` split so that this property survives
//! filtering and re-rendering.
//!
//! Children are reference counted so that several trees (for example a tree
//! filtered for preprocessor regions and the original) can share subtrees.

mod reader;
mod writer;

use std::rc::Rc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::position::Position;

pub use reader::parse_document;
pub use writer::{to_pretty_xml_string, to_xml_string};

/// Default srcML namespace (`src`).
pub const SRC_NAMESPACE: &str = "http://www.srcML.org/srcML/src";
/// Namespace of the preprocessor elements (`cpp:`).
pub const CPP_NAMESPACE: &str = "http://www.srcML.org/srcML/cpp";
/// Namespace of the position attributes (`pos:`).
pub const POSITION_NAMESPACE: &str = "http://www.srcML.org/srcML/position";

/// Errors raised while reading or writing srcML documents.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("unexpected closing tag `{0}`")]
    UnbalancedClose(String),

    #[error("XML document has no root element")]
    NoRoot,

    #[error("failed to write XML: {0}")]
    Write(String),
}

/// One element of a srcML tree.
///
/// `name` is the raw qualified name (`"cpp:define"`, `"decl_stmt"`); [`tag`](Self::tag)
/// returns the local part.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    name: String,
    text: Option<String>,
    tail: Option<String>,
    attributes: IndexMap<String, String>,
    children: Vec<Rc<XmlNode>>,
}

impl XmlNode {
    /// Create an element without text, attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: set the text preceding the first child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: set the text following the closing tag.
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    /// Builder: add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: XmlNode) -> Self {
        self.children.push(Rc::new(child));
        self
    }

    /// The raw qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The local tag name, without namespace prefix.
    pub fn tag(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Text preceding the first child, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Text following the closing tag, if any.
    pub fn tail(&self) -> Option<&str> {
        self.tail.as_deref()
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text;
    }

    pub fn set_tail(&mut self, tail: Option<String>) {
        self.tail = tail;
    }

    /// Value of attribute `name` (raw qualified name, e.g. `"pos:start"`).
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn children(&self) -> &[Rc<XmlNode>] {
        &self.children
    }

    /// Replace the children of this element.
    pub fn set_children(&mut self, children: Vec<Rc<XmlNode>>) {
        self.children = children;
    }

    pub fn push_child(&mut self, child: Rc<XmlNode>) {
        self.children.push(child);
    }

    /// Children whose local tag is `tag`.
    pub fn children_with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Rc<XmlNode>> {
        self.children.iter().filter(move |c| c.tag() == tag)
    }

    /// First child whose local tag is `tag`.
    pub fn child_with_tag(&self, tag: &str) -> Option<&Rc<XmlNode>> {
        self.children.iter().find(|c| c.tag() == tag)
    }

    /// Whether this element has a direct `<name>` child.
    pub fn has_name_child(&self) -> bool {
        self.child_with_tag("name").is_some()
    }

    /// Position parsed from the `pos:start` attribute.
    pub fn start(&self) -> Option<Position> {
        self.position_attribute("start")
    }

    /// Position parsed from the `pos:end` attribute.
    pub fn end(&self) -> Option<Position> {
        self.position_attribute("end")
    }

    fn position_attribute(&self, which: &str) -> Option<Position> {
        self.attributes
            .iter()
            .find(|(k, _)| match k.rsplit_once(':') {
                Some((prefix, local)) => prefix == "pos" && local == which,
                None => false,
            })
            .and_then(|(_, v)| v.parse().ok())
    }

    /// The source code covered by this element.
    ///
    /// Concatenates the element text, every descendant and their tails. The
    /// element's own tail is excluded.
    pub fn verbatim(&self) -> String {
        let mut out = String::new();
        self.collect_verbatim(&mut out);
        out
    }

    fn collect_verbatim(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_verbatim(out);
            if let Some(tail) = &child.tail {
                out.push_str(tail);
            }
        }
    }

    /// Depth-first pre-order traversal, calling `f(node, depth)`.
    pub fn visit(&self, f: &mut dyn FnMut(&XmlNode, usize)) {
        self.visit_at(f, 0);
    }

    fn visit_at(&self, f: &mut dyn FnMut(&XmlNode, usize), depth: usize) {
        f(self, depth);
        for child in &self.children {
            child.visit_at(f, depth + 1);
        }
    }

    /// Wrap this element into a srcML `<unit>` root, as srcML expects when
    /// converting a single element back to source.
    pub fn embed_into_unit(&self) -> XmlNode {
        if self.tag() == "unit" {
            return self.clone();
        }
        let mut element = self.clone();
        element.tail = None;
        XmlNode::new("unit")
            .with_attribute("xmlns", SRC_NAMESPACE)
            .with_attribute("xmlns:cpp", CPP_NAMESPACE)
            .with_attribute("xmlns:pos", POSITION_NAMESPACE)
            .with_attribute("revision", "1.0.0")
            .with_attribute("language", "C++")
            .with_child(element)
    }
}
