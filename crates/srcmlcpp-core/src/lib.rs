//! Core types shared by the srcmlcpp crates.
//!
//! - [`xml`]: the srcML tree model ([`XmlNode`]) with its reader and writer.
//! - [`position`]: `line:column` source positions carried by srcML elements.

pub mod position;
pub mod xml;

pub use position::{Position, Span};
pub use xml::{XmlError, XmlNode};
