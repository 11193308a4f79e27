//! Elements without children.

/// A standalone comment, without its comment markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppComment {
    pub comment: String,
}

/// `#if`, `#ifdef`, `#ifndef`, `#else`, `#elif` or `#endif`, kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppConditionMacro {
    pub macro_code: String,
}

/// `#define NAME(params) value`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppDefine {
    pub macro_name: String,
    /// `(x, y)`, or empty for object-like macros.
    pub macro_parameters_str: String,
    pub macro_value: String,
}

/// An element that could not be, or is not meant to be, understood.
///
/// Function bodies and constructor initializer lists are stored this way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppUnprocessed {
    /// The srcML tag of the element.
    pub tag: String,
    /// The code of the element.
    pub code: String,
}
