//! Warning categories, used to silence families of warnings.

use std::fmt;

use serde::Deserialize;

use crate::error::ErrorCode;

/// Category of a warning emitted while building the AST.
///
/// Listed in `SrcmlcppOptions::ignored_warnings` to silence a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum WarningType {
    #[default]
    Undefined,

    Unclassified,

    /// A cpp element was stored as `CppUnprocessed`.
    SrcmlcppIgnoreElement,

    /// A parameter list contains an unexpected tag.
    SrcmlcppUnhandledTagParameterList,

    /// The value of an enum element cannot be deduced.
    EnumUnparsableValue,
}

impl WarningType {
    /// The error code reported alongside warnings of this category.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            WarningType::Undefined | WarningType::Unclassified => None,
            WarningType::SrcmlcppIgnoreElement => Some(ErrorCode::E200),
            WarningType::SrcmlcppUnhandledTagParameterList => Some(ErrorCode::E201),
            WarningType::EnumUnparsableValue => Some(ErrorCode::E202),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::Undefined => "Undefined",
            WarningType::Unclassified => "Unclassified",
            WarningType::SrcmlcppIgnoreElement => "SrcmlcppIgnoreElement",
            WarningType::SrcmlcppUnhandledTagParameterList => "SrcmlcppUnhandledTagParameterList",
            WarningType::EnumUnparsableValue => "EnumUnparsableValue",
        }
    }
}

impl fmt::Display for WarningType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_type_codes() {
        assert_eq!(WarningType::Undefined.code(), None);
        assert_eq!(WarningType::SrcmlcppIgnoreElement.code(), Some(ErrorCode::E200));
        assert_eq!(WarningType::EnumUnparsableValue.code(), Some(ErrorCode::E202));
    }

    #[test]
    fn test_warning_type_display() {
        assert_eq!(WarningType::SrcmlcppIgnoreElement.to_string(), "SrcmlcppIgnoreElement");
    }
}
