//! Workarounds for constructs that srcML misparses.
//!
//! `void Foo(int v = 0);` is a `function_decl`, but `void Foo(P p = {});`
//! is parsed as a `decl_stmt` calling `Foo` with the expression
//! `P p = {}`. The braces are replaced by a call to a marker function, the
//! rewritten code is converted again, and the default values are restored.
//!
//! Inside a class, `Foo(P p = {});` is parsed as a `macro`: it is recovered
//! as a constructor when it starts with the class name.

use std::rc::Rc;

use log::debug;
use srcmlcpp_core::XmlNode;

use crate::{
    ast::{CppNode, CppUnit, NodeId},
    comments::ElementAndComments,
    parse::{ParseError, Parser, Step, parse_unit},
    wrapper::SrcmlWrapper,
};

/// Name of the marker function standing for `{...}`.
pub const BRACE_INIT_MARKER: &str = "__brace_init_marker__";

/// The `<expr>` of an argument with its `{...}` block replaced by a marker
/// call, when it looks like `P p = {...}`.
fn rewrite_brace_argument(expr: &XmlNode) -> Option<XmlNode> {
    let nb_names = expr.children_with_tag("name").count();
    let has_equal = expr
        .children_with_tag("operator")
        .any(|op| op.text().is_some_and(|t| t.trim() == "="));
    let block_index = expr.children().iter().position(|c| c.tag() == "block")?;
    let block = &expr.children()[block_index];
    let block_code = block.verbatim();
    let block_code = block_code.trim();
    let is_braced = block_code.starts_with('{') && block_code.ends_with('}');
    if nb_names != 2 || !has_equal || !is_braced {
        return None;
    }

    let inner = block_code[1..block_code.len() - 1].trim();
    let mut marker_call = XmlNode::new("name").with_text(format!("{BRACE_INIT_MARKER}({inner})"));
    marker_call.set_tail(block.tail().map(str::to_string));
    let mut children = expr.children().to_vec();
    children[block_index] = Rc::new(marker_call);
    let mut rewritten = expr.clone();
    rewritten.set_children(children);
    Some(rewritten)
}

/// The code of the first `<decl>` of a `decl_stmt`, rewritten, when the
/// statement is in fact a function declaration with braced default values.
pub(crate) fn rewrite_suspicious_decl_stmt(decl_stmt: &XmlNode) -> Option<String> {
    let decl = decl_stmt.child_with_tag("decl")?;
    let arg_list_index = decl.children().iter().position(|c| c.tag() == "argument_list")?;
    let arg_list = &decl.children()[arg_list_index];

    let mut was_rewritten = false;
    let arguments: Vec<Rc<XmlNode>> = arg_list
        .children()
        .iter()
        .map(|argument| {
            if argument.tag() != "argument" {
                return Rc::clone(argument);
            }
            let Some(expr_index) = argument.children().iter().position(|c| c.tag() == "expr") else {
                return Rc::clone(argument);
            };
            match rewrite_brace_argument(&argument.children()[expr_index]) {
                Some(expr) => {
                    was_rewritten = true;
                    let mut children = argument.children().to_vec();
                    children[expr_index] = Rc::new(expr);
                    let mut argument = (**argument).clone();
                    argument.set_children(children);
                    Rc::new(argument)
                }
                None => Rc::clone(argument),
            }
        })
        .collect();
    if !was_rewritten {
        return None;
    }

    let mut new_arg_list = (**arg_list).clone();
    new_arg_list.set_children(arguments);
    let mut decl_children = decl.children().to_vec();
    decl_children[arg_list_index] = Rc::new(new_arg_list);
    let mut new_decl = (**decl).clone();
    new_decl.set_children(decl_children);
    Some(format!("{};", new_decl.verbatim().trim()))
}

/// `{1, 2}` from `__brace_init_marker__(1, 2)`.
fn restore_brace_init(value: &str) -> Option<String> {
    let inner = value
        .strip_prefix(BRACE_INIT_MARKER)?
        .strip_prefix('(')?
        .strip_suffix(')')?;
    Some(format!("{{{inner}}}"))
}

/// Restore the braced default values of the parameters of `function`.
fn restore_parameters_brace_init(unit: &mut CppUnit, function: NodeId) {
    for parameter in unit.function_parameters(function).to_vec() {
        let Some(decl) = unit.parameter_decl(parameter) else {
            continue;
        };
        if let Some(decl) = unit.node_mut(decl).as_decl_mut() {
            if let Some(restored) = restore_brace_init(&decl.initial_value_code) {
                decl.initial_value_code = restored;
            }
        }
    }
}

impl Parser<'_> {
    /// Convert and parse a snippet of code with the options of this parse.
    fn parse_snippet(&self, code: &str) -> Result<CppUnit, ParseError> {
        let options = self.unit.options().clone();
        let xml = self.service.source_to_xml(code, options.dump_positions)?;
        parse_unit(options, SrcmlWrapper::new(Rc::new(xml), None), self.service)
    }

    /// The function declaration hidden in a `decl_stmt`, imported into the
    /// unit, if the statement is suspicious.
    pub(super) fn function_from_suspicious_decl_stmt(&mut self, child: &ElementAndComments) -> Step<Option<NodeId>> {
        let element = &child.element;
        let Some(fixed_code) = rewrite_suspicious_decl_stmt(element.xml()) else {
            return Ok(None);
        };
        debug!(code = fixed_code.as_str(); "Reparsing a decl_stmt as a function declaration");

        let mut fixed_unit = self.parse_snippet(&fixed_code)?;
        let functions = fixed_unit.all_functions_recursive(fixed_unit.root());
        let [function] = functions.as_slice() else {
            return Err(element
                .malformed(format!("Expected one function, got {}", functions.len()))
                .into());
        };
        restore_parameters_brace_init(&mut fixed_unit, *function);

        let imported = self.unit.import_subtree(&fixed_unit, *function);
        *self.unit.comments_mut(imported) = child.comments.clone();
        Ok(Some(imported))
    }

    /// A constructor declaration misparsed as a `macro` inside a class.
    ///
    /// Returns `None` when the macro does not start with the class name
    /// as a whole word.
    pub(super) fn parse_macro_as_constructor(&mut self, child: &ElementAndComments) -> Step<Option<NodeId>> {
        let element = &child.element;
        let Some(class_name) = self.class_names.last().cloned() else {
            return Ok(None);
        };
        let code = element.verbatim_source();
        let Some(rest) = code.trim_start().strip_prefix(class_name.as_str()) else {
            return Ok(None);
        };
        // `FooBar(...)` inside `struct Foo` is another macro.
        if rest.starts_with(|c: char| c.is_alphanumeric() || c == '_') {
            return Ok(None);
        }
        let fixed_code = format!("void blah{rest};");
        debug!(code = fixed_code.as_str(); "Reparsing a macro as a constructor");

        let mut fixed_unit = self.parse_snippet(&fixed_code)?;
        let functions = fixed_unit.all_functions_recursive(fixed_unit.root());
        let [function] = functions.as_slice() else {
            return Err(element
                .malformed(format!("Expected one function, got {}", functions.len()))
                .into());
        };
        restore_parameters_brace_init(&mut fixed_unit, *function);

        let node = fixed_unit.node_mut(*function);
        if let Some(mut constructor) = node.as_function().cloned() {
            constructor.function_name = class_name;
            constructor.return_type = None;
            *node = CppNode::ConstructorDecl(constructor);
        }

        let imported = self.unit.import_subtree(&fixed_unit, *function);
        *self.unit.comments_mut(imported) = child.comments.clone();
        Ok(Some(imported))
    }
}
