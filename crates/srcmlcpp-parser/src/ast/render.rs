//! Rendering elements back to C++ code.
//!
//! The rendering is normalized: `int const *a=nullptr;` is rendered as
//! `const int * a = nullptr;`. Comments are kept, function bodies and other
//! unprocessed elements are rendered as `<unprocessed_{tag}/>`.

use crate::ast::{CppDecl, CppFunctionDecl, CppNode, CppType, CppUnit, NodeId};

/// Prefix every non empty line of `code` with `indent`.
pub(crate) fn indent_code(code: &str, indent: &str) -> String {
    code.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl CppUnit {
    /// The element as C++ code, without its comments.
    pub fn str_code(&self, id: NodeId) -> String {
        match self.node(id) {
            CppNode::Unit(_) | CppNode::Block(_) => self.str_block(id, false),
            CppNode::PublicProtectedPrivate(ppp) => {
                let comments = self.comments(id);
                let mut code = comments.top_comment_code(true, true);
                code.push_str(ppp.access_type.as_str());
                code.push(':');
                if ppp.is_default_access {
                    code.push_str(" // <default_access_type/>");
                } else {
                    code.push_str(&comments.eol_comment_code());
                }
                code.push('\n');
                code.push_str(&indent_code(&self.str_block(id, false), &self.options().indent_cpp_str));
                code
            }
            CppNode::Type(cpp_type) => cpp_type.str_code(),
            CppNode::Decl(decl) => self.str_decl(decl),
            CppNode::DeclStatement(stmt) => stmt
                .decls
                .iter()
                .map(|d| self.str_commented_with(*d, false, true))
                .collect::<Vec<_>>()
                .join("\n"),
            CppNode::Parameter(parameter) => match parameter.decl {
                Some(decl) => self.str_commented(decl),
                None => format!("{} {}", parameter.template_type, parameter.template_name),
            },
            CppNode::ParameterList(_) => self.str_types_names_default_for_signature(id),
            CppNode::Template(template) => format!("template<{}>\n", self.str_code(template.parameter_list)),
            CppNode::FunctionDecl(_) => format!("{};", self.str_signature(id)),
            CppNode::ConstructorDecl(_) => self.str_signature(id),
            CppNode::Function(function) | CppNode::Constructor(function) => {
                let mut code = self.str_signature(id);
                if let Some(body) = function.body {
                    code.push('\n');
                    code.push_str(&self.str_code(body));
                }
                code
            }
            CppNode::Struct(cpp_struct) | CppNode::Class(cpp_struct) => {
                let keyword = if matches!(self.node(id), CppNode::Class(_)) {
                    "class"
                } else {
                    "struct"
                };
                let mut code = self.str_template(id);
                code.push_str(&format!("{keyword} {}", cpp_struct.class_name));
                if let Some(super_list) = cpp_struct.super_list {
                    code.push_str(&self.str_code(super_list));
                }
                code.push_str("\n{\n");
                code.push_str(&self.str_block(cpp_struct.block, false));
                code.push_str("};\n");
                code
            }
            CppNode::Super(cpp_super) => cpp_super.str_code(),
            CppNode::SuperList(list) => {
                if list.supers.is_empty() {
                    String::new()
                } else {
                    let supers: Vec<String> = list.supers.iter().map(|s| self.str_code(*s)).collect();
                    format!(" : {}", supers.join(", "))
                }
            }
            CppNode::Namespace(ns) => format!(
                "namespace {}\n{{\n{}}}",
                ns.ns_name,
                indent_code(&self.str_block(ns.block, false), &self.options().indent_cpp_str)
            ),
            CppNode::Enum(cpp_enum) => {
                let mut code = if cpp_enum.is_enum_class() {
                    format!("enum class {}", cpp_enum.enum_name)
                } else {
                    format!("enum {}", cpp_enum.enum_name)
                };
                if !cpp_enum.enum_data_type.is_empty() {
                    code.push_str(&format!(" : {}", cpp_enum.enum_data_type));
                }
                code.push_str("\n{\n");
                code.push_str(&indent_code(
                    &self.str_block(cpp_enum.block, true),
                    &self.options().indent_cpp_str,
                ));
                code.push_str("};\n");
                code
            }
            CppNode::Comment(comment) => comment
                .comment
                .split('\n')
                .map(|line| format!("//{line}"))
                .collect::<Vec<_>>()
                .join("\n"),
            CppNode::EmptyLine => String::new(),
            CppNode::ConditionMacro(condition) => condition.macro_code.trim_end().to_string(),
            CppNode::Define(define) => {
                let mut code = format!("#define {}{}", define.macro_name, define.macro_parameters_str);
                if !define.macro_value.is_empty() {
                    code.push(' ');
                    code.push_str(&define.macro_value);
                }
                code
            }
            CppNode::Unprocessed(unprocessed) => format!("<unprocessed_{}/>", unprocessed.tag),
        }
    }

    /// The element as C++ code, with its comments.
    pub fn str_commented(&self, id: NodeId) -> String {
        self.str_commented_with(id, false, false)
    }

    /// `is_enum` appends a `,` (enum values), `is_decl_stmt` a `;`.
    pub(crate) fn str_commented_with(&self, id: NodeId, is_enum: bool, is_decl_stmt: bool) -> String {
        match self.node(id) {
            CppNode::PublicProtectedPrivate(_) | CppNode::EmptyLine => self.str_code(id),
            CppNode::Unit(_) | CppNode::Block(_) => self.str_block(id, false),
            _ => {
                let comments = self.comments(id);
                let mut code = comments.top_comment_code(true, true);
                code.push_str(&self.str_code(id));
                if is_enum {
                    code.push(',');
                }
                if is_decl_stmt {
                    code.push(';');
                }
                code.push_str(&comments.eol_comment_code());
                code
            }
        }
    }

    /// The children of a block, one per line. Enum values are separated by
    /// commas.
    pub fn str_block(&self, block: NodeId, is_enum: bool) -> String {
        let children = self.block_children(block);
        let last_value = children
            .iter()
            .rposition(|c| matches!(self.node(*c), CppNode::Decl(_)));
        let mut code = String::new();
        for (i, child) in children.iter().enumerate() {
            let is_value = matches!(self.node(*child), CppNode::Decl(_));
            let needs_comma = is_enum && is_value && Some(i) != last_value;
            let child_code = self.str_commented_with(*child, needs_comma, false);
            code.push_str(&child_code);
            if !child_code.ends_with('\n') {
                code.push('\n');
            }
        }
        code
    }

    fn str_decl(&self, decl: &CppDecl) -> String {
        let mut code = String::new();
        if let Some(cpp_type) = decl.cpp_type {
            code.push_str(&self.str_code(cpp_type));
            code.push(' ');
        }
        code.push_str(&decl.decl_name);
        code.push_str(&decl.c_array_code);
        if decl.has_initial_value() {
            code.push_str(" = ");
            code.push_str(&decl.initial_value_code);
        }
        code
    }

    // =========================================================================
    // Functions
    // =========================================================================

    /// The signature of a function, without `;` nor body.
    ///
    /// ```cpp
    /// template<typename T> T f<int>(int a) const
    /// auto f(int a) -> int
    /// ```
    pub fn str_signature(&self, id: NodeId) -> String {
        let Some(function) = self.function(id) else {
            return String::new();
        };
        let params = self.str_code(function.parameter_list);
        let name = format!("{}{}", function.function_name, self.str_template_specialization(id));
        let mut signature = self.str_template(id);
        let prefixes = self.options().functions_api_prefixes_list();
        match self.function_return_type(id) {
            None => signature.push_str(&format!("{name}({params})")),
            Some(return_type) if self.is_arrow_notation_return_type(id) => {
                let return_type = return_type.str_return_type(&prefixes);
                if return_type == "auto" {
                    signature.push_str(&format!("auto {name}({params})"));
                } else {
                    signature.push_str(&format!("auto {name}({params}) -> {return_type}"));
                }
            }
            Some(return_type) => {
                signature.push_str(&format!("{} {name}({params})", return_type.str_return_type(&prefixes)));
            }
        }
        push_specifiers(&mut signature, function);
        signature
    }

    // =========================================================================
    // Parameter lists
    // =========================================================================

    fn parameter_decls(&self, parameter_list: NodeId) -> Vec<&CppDecl> {
        self.parameters(parameter_list)
            .iter()
            .filter_map(|p| self.parameter_decl(*p))
            .filter_map(|d| self.decl(d))
            .collect()
    }

    fn decl_type_code(&self, decl: &CppDecl) -> String {
        decl.cpp_type
            .and_then(|t| self.node(t).as_type())
            .map(CppType::str_code)
            .unwrap_or_default()
    }

    /// `int, bool`
    pub fn str_types_names_only(&self, parameter_list: NodeId) -> String {
        self.parameter_decls(parameter_list)
            .into_iter()
            .map(|d| self.decl_type_code(d))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `int a, bool flag = true`
    pub fn str_types_names_default_for_signature(&self, parameter_list: NodeId) -> String {
        self.parameters(parameter_list)
            .iter()
            .map(|p| match self.parameter_decl(*p).and_then(|d| self.decl(d)) {
                Some(decl) => self.str_decl(decl),
                None => self.str_code(*p),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `a, flag`
    pub fn str_names_only_for_call(&self, parameter_list: NodeId) -> String {
        self.parameter_decls(parameter_list)
            .into_iter()
            .map(|d| d.decl_name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The parameter types, where C arrays decay to pointers: `int *, bool`.
    pub fn str_types_only_for_overload(&self, parameter_list: NodeId) -> String {
        self.parameter_decls(parameter_list)
            .into_iter()
            .map(|d| {
                let mut type_code = self.decl_type_code(d);
                if d.c_array_code.starts_with('[') {
                    type_code.push_str(" *");
                }
                type_code
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn push_specifiers(signature: &mut String, function: &CppFunctionDecl) {
    if function.specifiers.is_empty() {
        return;
    }
    if !signature.is_empty() {
        signature.push(' ');
    }
    signature.push_str(&function.specifiers.join(" "));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{CppComment, CppDeclStatement, CppEnum, CppParameter, CppParameterList},
        comments::CppElementComments,
        options::SrcmlcppOptions,
    };

    fn push(unit: &mut CppUnit, node: CppNode) -> NodeId {
        unit.push(None, CppElementComments::default(), node)
    }

    fn push_decl(unit: &mut CppUnit, typenames: &[&str], name: &str, value: &str) -> NodeId {
        let cpp_type = (!typenames.is_empty())
            .then(|| push(unit, CppNode::Type(CppType::from_typenames(typenames))));
        push(
            unit,
            CppNode::Decl(CppDecl {
                cpp_type,
                decl_name: name.to_string(),
                initial_value_code: value.to_string(),
                ..CppDecl::default()
            }),
        )
    }

    #[test]
    fn test_indent_code() {
        assert_eq!(indent_code("a\n\nb\n", "  "), "  a\n\n  b\n");
    }

    #[test]
    fn test_decl_statement_with_comments() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let a = push_decl(&mut unit, &["int"], "a", "1");
        let b = push_decl(&mut unit, &["int"], "b", "");
        unit.comments_mut(a).comment_on_previous_lines = " The a".to_string();
        unit.comments_mut(b).comment_end_of_line = " The b".to_string();
        let stmt = push(&mut unit, CppNode::DeclStatement(CppDeclStatement { decls: vec![a, b] }));
        let root = unit.root();
        unit.add_element(root, stmt);
        unit.fill_parents(root);

        assert_eq!(unit.str_code(root), "// The a\nint a = 1;\nint b; // The b\n");
    }

    #[test]
    fn test_enum_block() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let a = push_decl(&mut unit, &[], "A", "");
        let comment = push(
            &mut unit,
            CppNode::Comment(CppComment {
                comment: " B follows".to_string(),
            }),
        );
        let b = push_decl(&mut unit, &[], "B", "3");
        let block = push(&mut unit, CppNode::Block(crate::ast::CppBlock { children: vec![a, comment, b] }));
        let cpp_enum = push(
            &mut unit,
            CppNode::Enum(CppEnum {
                enum_type: "class".to_string(),
                enum_name: "E".to_string(),
                block,
                enum_data_type: "int".to_string(),
            }),
        );
        let root = unit.root();
        unit.add_element(root, cpp_enum);
        unit.fill_parents(root);

        assert_eq!(
            unit.str_code(cpp_enum),
            "enum class E : int\n{\n    A,\n    // B follows\n    B = 3\n};\n"
        );
    }

    #[test]
    fn test_function_signature() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let a = push_decl(&mut unit, &["int"], "a", "");
        let flag = push_decl(&mut unit, &["bool"], "flag", "true");
        let p_a = push(&mut unit, CppNode::Parameter(CppParameter { decl: Some(a), ..CppParameter::default() }));
        let p_flag = push(
            &mut unit,
            CppNode::Parameter(CppParameter {
                decl: Some(flag),
                ..CppParameter::default()
            }),
        );
        let parameter_list = push(
            &mut unit,
            CppNode::ParameterList(CppParameterList {
                parameters: vec![p_a, p_flag],
            }),
        );
        let return_type = push(&mut unit, CppNode::Type(CppType::from_typenames(&["auto", "int"])));
        let function = push(
            &mut unit,
            CppNode::FunctionDecl(CppFunctionDecl {
                return_type: Some(return_type),
                function_name: "f".to_string(),
                parameter_list,
                specifiers: vec!["const".to_string()],
                ..CppFunctionDecl::default()
            }),
        );
        let root = unit.root();
        unit.add_element(root, function);
        unit.fill_parents(root);

        assert_eq!(unit.str_code(function), "auto f(int a, bool flag = true) -> int const;");
        assert_eq!(unit.str_types_names_only(parameter_list), "int, bool");
        assert_eq!(unit.str_names_only_for_call(parameter_list), "a, flag");
    }
}
