//! Labeled source spans for diagnostic messages.

use srcmlcpp_core::Span;

/// A labeled `line:column` span in the parsed C++ code.
///
/// Primary labels mark the element a diagnostic is about; secondary labels
/// point at related code.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the span this label applies to.
    pub fn span(&self) -> Span {
        self.span
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}

#[cfg(test)]
mod tests {
    use srcmlcpp_core::Position;

    use super::*;

    fn span() -> Span {
        Span::new(Position::new(1, 1), Position::new(1, 4))
    }

    #[test]
    fn test_primary_label() {
        let label = Label::primary(span(), "here");
        assert!(label.is_primary());
        assert!(!label.is_secondary());
        assert_eq!(label.message(), "here");
        assert_eq!(label.span(), span());
    }

    #[test]
    fn test_secondary_label() {
        let label = Label::secondary(span(), "related");
        assert!(label.is_secondary());
    }
}
