//! Error and diagnostic system for the srcmlcpp parser.
//!
//! Building the AST never stops at the first problem: an element that cannot
//! be understood is stored as `CppUnprocessed` and a warning [`Diagnostic`]
//! is recorded on the unit. This module provides:
//! - [`ElementError`], the recoverable error raised while parsing one element
//! - [`Diagnostic`] with error codes, severity and positional labels
//! - [`WarningType`] categories used to silence families of warnings
//! - a collector that applies the silencing options
//!
//! # Example
//!
//! ```
//! # use srcmlcpp_parser::error::{Diagnostic, ErrorCode};
//! # use srcmlcpp_core::{Position, Span};
//!
//! let span = Span::new(Position::new(3, 1), Position::new(3, 12));
//!
//! let diag = Diagnostic::warning("a cpp element was stored as CppUnprocessed")
//!     .with_code(ErrorCode::E200)
//!     .with_label(span, "ignored element")
//!     .with_help("check that the code compiles with a C++ compiler");
//! ```

mod collector;
mod diagnostic;
mod element_error;
mod error_code;
mod label;
mod severity;
mod warning_type;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use element_error::{ElementError, ElementErrorKind};
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
pub use warning_type::WarningType;
