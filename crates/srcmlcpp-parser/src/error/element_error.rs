//! Recoverable errors raised while converting one srcML element.

use std::fmt;

use srcmlcpp_core::Span;

use crate::error::{Diagnostic, ErrorCode};

/// Kind of a recoverable element error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementErrorKind {
    /// The srcML tree does not have the expected shape.
    MalformedTree,

    /// The C++ construct is valid but not supported.
    UnsupportedConstruct,
}

/// An error raised while parsing a single element.
///
/// The element is then stored as `CppUnprocessed` and parsing goes on with
/// its siblings. `context` describes where the element comes from
/// (`While parsing a "decl", corresponding to this C++ code: ...`).
#[derive(Debug, Clone)]
pub struct ElementError {
    kind: ElementErrorKind,
    code: ErrorCode,
    tag: String,
    message: String,
    context: String,
    span: Option<Span>,
}

impl ElementError {
    pub fn new(
        kind: ElementErrorKind,
        code: ErrorCode,
        tag: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code,
            tag: tag.into(),
            message: message.into(),
            context: String::new(),
            span: None,
        }
    }

    /// Attach the location description of the failing element.
    pub fn with_context(mut self, context: impl Into<String>, span: Option<Span>) -> Self {
        self.context = context.into();
        self.span = span;
        self
    }

    pub fn kind(&self) -> ElementErrorKind {
        self.kind
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Tag of the srcML element that failed.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Convert this error into a diagnostic of the given severity builder.
    pub fn to_diagnostic(&self, diagnostic: Diagnostic) -> Diagnostic {
        let diagnostic = match self.span {
            Some(span) => diagnostic.with_label(span, self.message.clone()),
            None => diagnostic,
        };
        diagnostic.with_help(format!("{}: {}", self.code, self.code.description()))
    }
}

impl fmt::Display for ElementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.context.is_empty() {
            write!(f, "\n{}", self.context)?;
        }
        Ok(())
    }
}

impl std::error::Error for ElementError {}
