//! A srcML element together with the file it comes from.

use std::rc::Rc;

use srcmlcpp_core::{Position, Span, XmlNode};

use crate::error::{ElementError, ElementErrorKind, ErrorCode};

/// Number of source lines quoted in error contexts.
const CONTEXT_MAX_LINES: usize = 3;

/// One srcML element plus the name of the file it was parsed from.
///
/// Every AST element keeps the wrapper it was built from, which gives access
/// to its original code and position.
#[derive(Debug, Clone)]
pub struct SrcmlWrapper {
    xml: Rc<XmlNode>,
    filename: Option<Rc<str>>,
}

impl SrcmlWrapper {
    pub fn new(xml: Rc<XmlNode>, filename: Option<Rc<str>>) -> Self {
        Self { xml, filename }
    }

    /// Wrap another element coming from the same file.
    pub fn sibling(&self, xml: &Rc<XmlNode>) -> Self {
        Self {
            xml: Rc::clone(xml),
            filename: self.filename.clone(),
        }
    }

    pub fn xml(&self) -> &Rc<XmlNode> {
        &self.xml
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn tag(&self) -> &str {
        self.xml.tag()
    }

    pub fn text(&self) -> Option<&str> {
        self.xml.text()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.xml.attribute(name)
    }

    pub fn children(&self) -> Vec<SrcmlWrapper> {
        self.xml.children().iter().map(|c| self.sibling(c)).collect()
    }

    pub fn child_with_tag(&self, tag: &str) -> Option<SrcmlWrapper> {
        self.xml.child_with_tag(tag).map(|c| self.sibling(c))
    }

    pub fn children_with_tag(&self, tag: &str) -> Vec<SrcmlWrapper> {
        self.xml
            .children_with_tag(tag)
            .map(|c| self.sibling(c))
            .collect()
    }

    pub fn start(&self) -> Option<Position> {
        self.xml.start()
    }

    pub fn end(&self) -> Option<Position> {
        self.xml.end()
    }

    pub fn span(&self) -> Option<Span> {
        Some(Span::new(self.start()?, self.end()?))
    }

    /// The C++ code covered by this element.
    pub fn verbatim_source(&self) -> String {
        self.xml.verbatim()
    }

    /// Whether the element has a direct `<name>` child.
    pub fn has_xml_name(&self) -> bool {
        self.xml.has_name_child()
    }

    /// The code of the `<name>` child.
    ///
    /// Simple names (`<name>a</name>`) give their text; compound names such
    /// as `<name><name>a</name><index>[10]</index></name>` give their full
    /// code.
    pub fn extract_name_from_xml(&self) -> Option<String> {
        let name = self.xml.child_with_tag("name")?;
        match name.text() {
            Some(text) => Some(text.to_string()),
            None => Some(name.verbatim()),
        }
    }

    /// `file:line:column` of the element start.
    pub fn str_code_location(&self) -> String {
        let header = self.filename.as_deref().unwrap_or("Position");
        match self.start() {
            Some(start) => format!("{header}:{}:{}", start.line(), start.column()),
            None => header.to_string(),
        }
    }

    /// Describe the element for error messages, quoting its first lines.
    pub fn context_message(&self) -> String {
        let code = self.verbatim_source();
        let snippet: Vec<String> = code
            .lines()
            .take(CONTEXT_MAX_LINES)
            .map(|line| format!("    {line}"))
            .collect();
        format!(
            "While parsing a \"{}\", corresponding to this C++ code:\n{}\n{}",
            self.tag(),
            self.str_code_location(),
            snippet.join("\n")
        )
    }

    /// A malformed-tree error located at this element.
    pub fn malformed(&self, message: impl Into<String>) -> ElementError {
        self.element_error(ElementErrorKind::MalformedTree, ErrorCode::E001, message)
    }

    /// A malformed-tree error with a more specific code.
    pub fn malformed_with_code(&self, code: ErrorCode, message: impl Into<String>) -> ElementError {
        self.element_error(ElementErrorKind::MalformedTree, code, message)
    }

    /// An unhandled-tag error for `child`, located at this element.
    pub fn unhandled_tag(&self, child: &SrcmlWrapper) -> ElementError {
        self.element_error(
            ElementErrorKind::MalformedTree,
            ErrorCode::E002,
            format!("unhandled tag {}", child.tag()),
        )
    }

    /// An unsupported-construct error located at this element.
    pub fn unsupported(&self, code: ErrorCode, message: impl Into<String>) -> ElementError {
        self.element_error(ElementErrorKind::UnsupportedConstruct, code, message)
    }

    fn element_error(
        &self,
        kind: ElementErrorKind,
        code: ErrorCode,
        message: impl Into<String>,
    ) -> ElementError {
        ElementError::new(kind, code, self.tag(), message)
            .with_context(self.context_message(), self.span())
    }
}
