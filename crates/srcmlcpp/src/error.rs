//! Error types for srcmlcpp operations.
//!
//! This module provides the main error type [`SrcmlcppError`] which wraps
//! the error conditions that can occur while converting and parsing code.

use std::io;

use thiserror::Error;

use srcmlcpp_core::XmlError;
use srcmlcpp_parser::{ParseError, SrcmlError};

/// The main error type for srcmlcpp operations.
///
/// Problems with a single element are not errors: they are reported as
/// diagnostics on the parsed unit. These variants stop the whole operation.
#[derive(Debug, Error)]
pub enum SrcmlcppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Srcml(#[from] SrcmlError),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    #[error("{err}")]
    Parse { err: ParseError, filename: Option<String> },

    #[error("could not find a child of type {kind} in: {code}")]
    NotFound { kind: &'static str, code: String },
}

impl From<ParseError> for SrcmlcppError {
    fn from(err: ParseError) -> Self {
        Self::Parse { err, filename: None }
    }
}

impl SrcmlcppError {
    /// Create a new `Parse` error with the associated file name.
    pub fn new_parse_error(err: ParseError, filename: Option<&str>) -> Self {
        Self::Parse {
            err,
            filename: filename.map(str::to_string),
        }
    }
}
