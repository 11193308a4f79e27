//! # srcmlcpp Parser
//!
//! Builds a typed C++ AST from srcML trees. This crate provides the
//! pipeline from a srcML `<unit>` to a [`CppUnit`]:
//!
//! 1. **Filter** - Drop excluded preprocessor regions (optional)
//! 2. **Attach comments** - Give every element the comments around it
//! 3. **Dispatch** - Convert each child by tag, recursing into blocks
//! 4. **Link** - Fill parents and the scope identifiers cache
//!
//! Elements that cannot be understood are kept as `CppUnprocessed` and
//! reported as warnings on the unit.
//!
//! Converting C++ code to srcML is delegated to a [`SrcmlService`]; the
//! `srcmlcpp` crate provides one backed by the `srcml` executable.
//!
//! ## Usage
//!
//! ```
//! # use std::rc::Rc;
//! # use srcmlcpp_core::XmlNode;
//! # use srcmlcpp_parser::{parse_unit, SrcmlcppOptions, SrcmlError, SrcmlService, SrcmlWrapper};
//! struct NoService;
//!
//! impl SrcmlService for NoService {
//!     fn source_to_xml(&self, code: &str, _: bool) -> Result<XmlNode, SrcmlError> {
//!         Err(SrcmlError::Unavailable(code.to_string()))
//!     }
//!     fn xml_to_source(&self, node: &XmlNode) -> Result<String, SrcmlError> {
//!         Ok(node.verbatim())
//!     }
//! }
//!
//! let xml = XmlNode::new("unit").with_child(
//!     XmlNode::new("comment").with_attribute("type", "line").with_text("// hello"),
//! );
//! let unit = parse_unit(
//!     SrcmlcppOptions::default(),
//!     SrcmlWrapper::new(Rc::new(xml), None),
//!     &NoService,
//! )
//! .unwrap();
//! assert_eq!(unit.block_children(unit.root()).len(), 1);
//! ```

pub mod ast;
pub mod comments;
pub mod error;
pub mod options;
pub mod parse;
pub mod preprocessor;
pub mod scope;
pub mod service;
pub mod template;
pub mod wrapper;

pub use ast::{CppNode, CppUnit, NodeId};
pub use options::SrcmlcppOptions;
pub use parse::{ParseError, code_to_unit, parse_unit};
pub use service::{SrcmlError, SrcmlService};
pub use wrapper::SrcmlWrapper;
