//! Error codes for the srcmlcpp diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - srcML tree shape errors
//! - `E1xx` - C++ constructs the parser does not support
//! - `E2xx` - AST construction warnings

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Tree Errors (E0xx)
    // =========================================================================
    /// Malformed srcML tree.
    ///
    /// A required child element is missing, or an element does not have the
    /// shape srcML produces for this construct.
    E001,

    /// Unhandled tag.
    ///
    /// An element contains a child tag that is not expected at this place.
    E002,

    // =========================================================================
    // Unsupported Constructs (E1xx)
    // =========================================================================
    /// Unsupported construct.
    ///
    /// The construct is valid C++ but cannot be represented in the AST, for
    /// example C style function pointers or `function_decl` parameters.
    E100,

    /// Invalid type modifier.
    ///
    /// Only `*`, `&`, `&&` and `...` are accepted as type modifiers.
    E101,

    /// Missing type name.
    ///
    /// A type has no name, and none can be borrowed from a previous
    /// declaration of the same statement.
    E102,

    /// Unnamed element.
    ///
    /// A declaration, struct or class has no name.
    E103,

    /// Unparsable initializer list.
    ///
    /// An initializer list argument has no expression.
    E104,

    // =========================================================================
    // Construction Warnings (E2xx)
    // =========================================================================
    /// Element stored as unprocessed.
    ///
    /// An element could not be parsed; it was kept as opaque code.
    E200,

    /// Unhandled tag in a parameter list.
    E201,

    /// Unparsable enum value.
    ///
    /// The value of an enum element cannot be deduced from the previous
    /// element. `named_number_macros` can provide values for macros.
    E202,
}

impl ErrorCode {
    /// Returns the string representation of the error code (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
        }
    }

    /// Returns a short description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            // Tree errors
            ErrorCode::E001 => "malformed srcML tree",
            ErrorCode::E002 => "unhandled tag",
            // Unsupported constructs
            ErrorCode::E100 => "unsupported construct",
            ErrorCode::E101 => "invalid type modifier",
            ErrorCode::E102 => "missing type name",
            ErrorCode::E103 => "unnamed element",
            ErrorCode::E104 => "unparsable initializer list",
            // Construction warnings
            ErrorCode::E200 => "element stored as unprocessed",
            ErrorCode::E201 => "unhandled tag in parameter list",
            ErrorCode::E202 => "unparsable enum value",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "malformed srcML tree");
        assert_eq!(ErrorCode::E202.description(), "unparsable enum value");
    }
}
