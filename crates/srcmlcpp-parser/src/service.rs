//! The srcML conversion service.
//!
//! Converting C++ source to srcML (and back) is delegated to an external
//! tool. The parser only depends on the [`SrcmlService`] trait: the
//! `srcmlcpp` crate provides an implementation running the `srcml`
//! executable, and tests provide canned XML.

use std::io;

use thiserror::Error;

use srcmlcpp_core::{XmlError, XmlNode};

/// Fatal errors of the srcML service.
#[derive(Debug, Error)]
pub enum SrcmlError {
    #[error("I/O error while running srcML: {0}")]
    Io(#[from] io::Error),

    #[error("srcML exited with {status}: {stderr}")]
    Process { status: String, stderr: String },

    #[error("invalid srcML output: {0}")]
    Xml(#[from] XmlError),

    #[error("no srcML conversion available for this code: {0}")]
    Unavailable(String),
}

/// Converts C++ source code to a srcML tree and back.
pub trait SrcmlService {
    /// Convert C++ code to a srcML `<unit>` element.
    ///
    /// With `emit_positions`, every element carries `pos:start` and
    /// `pos:end` attributes.
    fn source_to_xml(&self, code: &str, emit_positions: bool) -> Result<XmlNode, SrcmlError>;

    /// Convert a srcML element back to C++ code.
    fn xml_to_source(&self, node: &XmlNode) -> Result<String, SrcmlError>;
}
