//! Conversion of a srcML tree into a [`CppUnit`].
//!
//! The parser walks the children of every block (unit, namespace, struct
//! body, access section, enum body) and dispatches on their tag. Each child
//! is parsed on its own: when it cannot be understood, it is stored as
//! `CppUnprocessed`, a warning is recorded on the unit, and parsing goes on
//! with the next sibling. Only failures of the srcML service abort a parse.
//!
//! ```text
//! <unit>
//!   <function_decl> ... </function_decl>   -> CppFunctionDecl
//!   <struct> ... </struct>                 -> CppStruct (recurses into its block)
//!   <typedef> ... </typedef>               -> CppUnprocessed
//! </unit>
//! ```

mod brace_init;
mod classes;
mod functions;
mod types;

use std::rc::Rc;

use log::{debug, info};
use regex::Regex;
use thiserror::Error;

use crate::{
    ast::{CppBlock, CppComment, CppConditionMacro, CppDefine, CppNode, CppUnit, CppUnprocessed, NodeId},
    comments::{
        CppElementComments, ElementAndComments, EMPTY_LINE_COMMENT_CONTENT, children_with_comments,
        mark_empty_lines,
    },
    error::{Diagnostic, ElementError, ErrorCode, WarningType},
    options::SrcmlcppOptions,
    service::{SrcmlError, SrcmlService},
    wrapper::SrcmlWrapper,
};

/// Fatal errors: the unit cannot be built at all.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("expected a srcML <unit> element, got <{0}>")]
    NotAUnit(String),

    #[error("invalid header_filter_acceptable_regex: {0}")]
    AcceptableRegex(#[from] regex::Error),

    #[error(transparent)]
    Srcml(#[from] SrcmlError),
}

/// Why parsing one element stopped.
#[derive(Debug)]
enum Failure {
    /// The element is stored as unprocessed, the parse goes on.
    Element(ElementError),
    /// The whole parse stops.
    Fatal(ParseError),
}

impl From<ElementError> for Failure {
    fn from(err: ElementError) -> Self {
        Failure::Element(err)
    }
}

impl From<ParseError> for Failure {
    fn from(err: ParseError) -> Self {
        Failure::Fatal(err)
    }
}

impl From<SrcmlError> for Failure {
    fn from(err: SrcmlError) -> Self {
        Failure::Fatal(ParseError::Srcml(err))
    }
}

type Step<T> = std::result::Result<T, Failure>;

/// Build a unit from a srcML `<unit>` element.
///
/// `service` is used when srcML misparses a construct and a rewritten
/// snippet has to be converted again.
pub fn parse_unit(
    options: SrcmlcppOptions,
    element: SrcmlWrapper,
    service: &dyn SrcmlService,
) -> Result<CppUnit, ParseError> {
    if element.tag() != "unit" {
        return Err(ParseError::NotAUnit(element.tag().to_string()));
    }
    let acceptable_regions = if options.header_filter_preprocessor_regions {
        Some(options.acceptable_regex()?)
    } else {
        None
    };

    let mut parser = Parser {
        unit: CppUnit::new(options, Some(element.clone())),
        service,
        acceptable_regions,
        class_names: Vec::new(),
    };
    let root = parser.unit.root();
    parser.fill_block(&element, root)?;

    let mut unit = parser.unit;
    unit.fill_parents(root);
    unit.fill_scope_identifiers_cache();
    info!(
        file = unit.filename().unwrap_or("<code>"),
        elements = unit.len(),
        warnings = unit.diagnostics().len();
        "Parsed srcML unit"
    );
    Ok(unit)
}

/// Convert C++ code with `service`, then build its unit.
///
/// The code goes through `code_preprocess_function` first, and its empty
/// lines are marked when `preserve_empty_lines` is set.
pub fn code_to_unit(
    code: &str,
    filename: Option<&str>,
    options: SrcmlcppOptions,
    service: &dyn SrcmlService,
) -> Result<CppUnit, ParseError> {
    let mut code = options.preprocess_code(code);
    if options.preserve_empty_lines {
        code = mark_empty_lines(&code);
    }
    let xml = service.source_to_xml(&code, options.dump_positions)?;
    let element = SrcmlWrapper::new(Rc::new(xml), filename.map(Rc::from));
    parse_unit(options, element, service)
}

/// State of one parse.
struct Parser<'s> {
    unit: CppUnit,
    service: &'s dyn SrcmlService,
    acceptable_regions: Option<Regex>,
    /// Names of the structs whose body is being parsed, innermost last.
    class_names: Vec<String>,
}

impl Parser<'_> {
    /// Parse the children of `element` and append them to `block`.
    fn fill_block(&mut self, element: &SrcmlWrapper, block: NodeId) -> Result<(), ParseError> {
        let in_access_section = matches!(self.unit.node(block), CppNode::PublicProtectedPrivate(_));
        let mut last_ignored: Option<SrcmlWrapper> = None;

        for child in children_with_comments(element, self.acceptable_regions.as_ref()) {
            let checkpoint = self.unit.len();
            let parsed = self.parse_block_child(&child, block, in_access_section, &mut last_ignored);
            match parsed {
                Ok(Some(id)) => self.unit.add_element(block, id),
                Ok(None) => {}
                Err(Failure::Fatal(err)) => return Err(err),
                Err(Failure::Element(err)) => {
                    self.unit.truncate_arena(checkpoint);
                    let id = self.push_unprocessed(&child);
                    self.unit.add_element(block, id);
                    self.warn_unprocessed(&err);
                }
            }
        }
        Ok(())
    }

    fn parse_block_child(
        &mut self,
        child: &ElementAndComments,
        block: NodeId,
        in_access_section: bool,
        last_ignored: &mut Option<SrcmlWrapper>,
    ) -> Step<Option<NodeId>> {
        let element = &child.element;
        let id = match element.tag() {
            "decl_stmt" => self.parse_decl_stmt_or_function(child)?,
            "macro" if in_access_section => match self.parse_macro_as_constructor(child)? {
                Some(constructor) => constructor,
                None => {
                    *last_ignored = Some(element.clone());
                    self.push_unprocessed(child)
                }
            },
            "decl" => self.parse_decl(element, child.comments.clone(), None)?,
            "function_decl" | "destructor_decl" => {
                self.parse_function_decl(child, CppNode::FunctionDecl)?
            }
            "function" | "destructor" => self.parse_function_decl(child, CppNode::Function)?,
            "constructor_decl" => self.parse_constructor(child, CppNode::ConstructorDecl)?,
            "constructor" => self.parse_constructor(child, CppNode::Constructor)?,
            "comment" => return Ok(self.parse_comment(child, last_ignored.as_ref())),
            "struct" | "class" => self.parse_struct_or_class(child)?,
            "namespace" => self.parse_namespace(child)?,
            "enum" => self.parse_enum(child)?,
            "block_content" => {
                let id = self.push(element, child.comments.clone(), CppNode::Block(CppBlock::default()));
                self.fill_block(element, id)?;
                id
            }
            "define" => self.parse_define(child),
            "if" | "ifdef" | "ifndef" | "endif" | "else" | "elif" => {
                let node = CppNode::ConditionMacro(CppConditionMacro {
                    macro_code: element.verbatim_source(),
                });
                self.push(element, child.comments.clone(), node)
            }
            "extern" => {
                self.fill_extern_c_block(element, block)?;
                return Ok(None);
            }
            "public" | "protected" | "private" => self.parse_public_protected_private(child)?,
            _ => {
                *last_ignored = Some(element.clone());
                self.push_unprocessed(child)
            }
        };
        Ok(Some(id))
    }

    // =========================================================================
    // Arena helpers
    // =========================================================================

    fn push(&mut self, element: &SrcmlWrapper, comments: CppElementComments, node: CppNode) -> NodeId {
        self.unit.push(Some(element.clone()), comments, node)
    }

    fn push_unprocessed(&mut self, child: &ElementAndComments) -> NodeId {
        let node = CppNode::Unprocessed(CppUnprocessed {
            tag: child.element.tag().to_string(),
            code: child.element.verbatim_source(),
        });
        self.push(&child.element, child.comments.clone(), node)
    }

    /// Function bodies and initializer lists are kept as code.
    fn push_opaque(&mut self, element: &SrcmlWrapper) -> NodeId {
        let node = CppNode::Unprocessed(CppUnprocessed {
            tag: element.tag().to_string(),
            code: element.verbatim_source(),
        });
        self.push(element, CppElementComments::default(), node)
    }

    /// A new block filled with the children of `element`.
    fn parse_block(&mut self, element: &SrcmlWrapper) -> Result<NodeId, ParseError> {
        let id = self.push(element, CppElementComments::default(), CppNode::Block(CppBlock::default()));
        self.fill_block(element, id)?;
        Ok(id)
    }

    // =========================================================================
    // Warnings
    // =========================================================================

    fn warn_unprocessed(&mut self, err: &ElementError) {
        let message = format!(
            "A cpp element of type \"{}\" was stored as CppUnprocessed. Details follow\n{err}",
            err.tag()
        );
        let diagnostic = Diagnostic::warning(message)
            .with_code(ErrorCode::E200)
            .with_warning_type(WarningType::SrcmlcppIgnoreElement);
        self.unit.push_diagnostic(err.to_diagnostic(diagnostic));
    }

    fn warn_at(&mut self, element: &SrcmlWrapper, warning_type: WarningType, message: &str) {
        let mut diagnostic = Diagnostic::warning(format!("{message}\n{}", element.context_message()))
            .with_warning_type(warning_type);
        if let Some(code) = warning_type.code() {
            diagnostic = diagnostic.with_code(code);
        }
        if let Some(span) = element.span() {
            diagnostic = diagnostic.with_label(span, message);
        }
        self.unit.push_diagnostic(diagnostic);
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    /// A comment, an empty line, or nothing when the comment explains an
    /// element that was ignored on the same line.
    fn parse_comment(&mut self, child: &ElementAndComments, last_ignored: Option<&SrcmlWrapper>) -> Option<NodeId> {
        let element = &child.element;
        let text = element.text().unwrap_or_default();
        if text.contains(EMPTY_LINE_COMMENT_CONTENT) {
            return Some(self.push(element, child.comments.clone(), CppNode::EmptyLine));
        }

        let mut comment = if text.contains('\n') {
            text.split('\n')
                .map(|line| if line.contains(EMPTY_LINE_COMMENT_CONTENT) { "" } else { line })
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            text.to_string()
        };

        if let Some(ignored) = last_ignored {
            let same_line = match (element.start(), ignored.end()) {
                (Some(start), Some(end)) => start.line() == end.line(),
                _ => false,
            };
            if same_line {
                if !matches!(ignored.tag(), "typedef" | "struct_decl") {
                    debug!(tag = ignored.tag(); "Dropped the comment of an ignored element");
                    return None;
                }
                comment = format!(" {}    {}", ignored.verbatim_source().trim(), comment.trim_start());
            }
        }
        Some(self.push(element, child.comments.clone(), CppNode::Comment(CppComment { comment })))
    }

    /// `#define NAME(params) value`
    fn parse_define(&mut self, child: &ElementAndComments) -> NodeId {
        let element = &child.element;
        let mut define = CppDefine::default();
        for part in element.children() {
            match part.tag() {
                "macro" => {
                    for macro_part in part.children() {
                        match macro_part.tag() {
                            "name" => {
                                if let Some(text) = macro_part.text() {
                                    define.macro_name = text.to_string();
                                }
                            }
                            "parameter_list" => define.macro_parameters_str = macro_part.verbatim_source(),
                            _ => {}
                        }
                    }
                }
                "value" => {
                    if let Some(text) = part.text() {
                        define.macro_value = text.to_string();
                    }
                }
                _ => {}
            }
        }
        self.push(element, child.comments.clone(), CppNode::Define(define))
    }

    /// Splice the content of `extern "C" { ... }` into `block`.
    ///
    /// Other linkages are ignored.
    fn fill_extern_c_block(&mut self, element: &SrcmlWrapper, block: NodeId) -> Result<(), ParseError> {
        let literals = element.children_with_tag("literal");
        let [literal] = literals.as_slice() else {
            return Ok(());
        };
        if literal.text() != Some("\"C\"") {
            return Ok(());
        }
        let blocks = element.children_with_tag("block");
        let [extern_block] = blocks.as_slice() else {
            return Ok(());
        };
        let contents = extern_block.children_with_tag("block_content");
        let [content] = contents.as_slice() else {
            return Ok(());
        };
        self.fill_block(content, block)
    }
}
