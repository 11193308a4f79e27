//! The core diagnostic type.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, labeled source spans, and help text.

use std::fmt;

use srcmlcpp_core::Span;

use crate::error::{Label, Severity, WarningType, error_code::ErrorCode};

/// A diagnostic message about the parsed C++ code.
///
/// # Example
///
/// ```text
/// warning[E200]: A cpp element of type "decl_stmt" was stored as CppUnprocessed. Details follow
///   --> foo.h:4:5
///    |
///  4 |     int f(int (*cb)(int));
///    |     ^^^^^^^^^^^^^^^^^^^^^^ ignored element
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    warning_type: WarningType,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the warning category used for silencing.
    pub fn warning_type(&self) -> WarningType {
        self.warning_type
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set the warning category.
    pub fn with_warning_type(mut self, warning_type: WarningType) -> Self {
        self.warning_type = warning_type;
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            warning_type: WarningType::Undefined,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "warning[E200]: message" or "warning: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use srcmlcpp_core::Position;

    use super::*;

    fn span() -> Span {
        Span::new(Position::new(2, 1), Position::new(2, 8))
    }

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert_eq!(diag.warning_type(), WarningType::Undefined);
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::warning("element skipped")
            .with_code(ErrorCode::E200)
            .with_warning_type(WarningType::SrcmlcppIgnoreElement)
            .with_label(span(), "here")
            .with_secondary_label(span(), "enclosing block")
            .with_help("simplify the declaration");

        assert!(diag.severity().is_warning());
        assert_eq!(diag.code(), Some(ErrorCode::E200));
        assert_eq!(diag.warning_type(), WarningType::SrcmlcppIgnoreElement);
        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
        assert_eq!(diag.help(), Some("simplify the declaration"));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::warning("unparsable enum value").with_code(ErrorCode::E202);
        assert_eq!(diag.to_string(), "warning[E202]: unparsable enum value");

        let diag = Diagnostic::error("boom");
        assert_eq!(diag.to_string(), "error: boom");
    }
}
