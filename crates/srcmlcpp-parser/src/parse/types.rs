//! Types, declarations and declaration statements.

use crate::{
    ast::{AUTHORIZED_MODIFIERS, CppDecl, CppDeclStatement, CppNode, CppType, NodeId},
    comments::{CppElementComments, ElementAndComments},
    error::ErrorCode,
    parse::{Parser, Step},
    wrapper::SrcmlWrapper,
};

/// The code of a `<name>`: its text, or the full code of a compound name
/// such as `std::vector<int>`.
pub(super) fn parse_name(element: &SrcmlWrapper) -> String {
    match element.text() {
        Some(text) => text.trim().to_string(),
        None => element.verbatim_source().trim().to_string(),
    }
}

/// The code of an `<expr>`.
///
/// A lone literal or name gives its text; other expressions (`1 << 20`,
/// `S()`) give their code.
pub(super) fn parse_expr(element: &SrcmlWrapper) -> String {
    let children = element.children();
    if let [single] = children.as_slice() {
        if matches!(single.tag(), "literal" | "name") {
            if let Some(text) = single.text() {
                return text.to_string();
            }
        }
    }
    element.verbatim_source().trim().to_string()
}

/// The value of an `<init>`, without the `=`.
pub(super) fn parse_init(element: &SrcmlWrapper) -> String {
    if let Some(expr) = element.child_with_tag("expr") {
        return parse_expr(&expr);
    }
    let code = element.verbatim_source();
    let code = code.trim();
    code.strip_prefix('=').unwrap_or(code).trim().to_string()
}

/// `{1, 2, 3}` from the `<argument_list>` of `int v{1, 2, 3};`.
fn parse_initializer_list(element: &SrcmlWrapper) -> Step<String> {
    let mut values = Vec::new();
    for argument in element.children_with_tag("argument") {
        let Some(expr) = argument.child_with_tag("expr") else {
            return Err(element
                .unsupported(ErrorCode::E104, "initializer list with an unparsable expression")
                .into());
        };
        values.push(parse_expr(&expr));
    }
    Ok(format!("{{{}}}", values.join(", ")))
}

impl Parser<'_> {
    /// Parse a `<type>`.
    ///
    /// `unsigned int` gives the typenames `["unsigned", "int"]`; composed
    /// types such as `std::map<int, std::string>` are kept as one typename.
    ///
    /// A type without name borrows the typenames of the previous declaration
    /// of the statement (`int a, b;`). Names starting with one of the API
    /// prefixes (`MY_API void f();`) are moved to the specifiers.
    pub(super) fn parse_type(
        &self,
        element: &SrcmlWrapper,
        previous_typenames: Option<&[String]>,
        is_operator_return_type: bool,
    ) -> Step<CppType> {
        let mut cpp_type = CppType::default();
        for child in element.children() {
            match child.tag() {
                "name" => cpp_type.typenames.push(parse_name(&child)),
                "specifier" => {
                    let text = child.text().ok_or_else(|| child.malformed("empty specifier"))?;
                    cpp_type.specifiers.push(text.to_string());
                }
                "modifier" => {
                    let text = child.text().ok_or_else(|| child.malformed("empty modifier"))?;
                    if !AUTHORIZED_MODIFIERS.contains(&text) {
                        return Err(child
                            .unsupported(ErrorCode::E101, format!("modifier \"{text}\" is not authorized"))
                            .into());
                    }
                    cpp_type.modifiers.push(text.to_string());
                }
                _ => return Err(element.unhandled_tag(&child).into()),
            }
        }

        // A cast operator has no return type: its type is its name.
        let is_unnamed = |t: &CppType| {
            t.typenames.is_empty() && !t.has_modifier("...") && !t.has_specifier("auto")
        };
        if !is_operator_return_type && is_unnamed(&cpp_type) {
            match previous_typenames {
                Some(typenames) if !typenames.is_empty() => cpp_type.typenames = typenames.to_vec(),
                _ => {
                    return Err(element
                        .malformed_with_code(ErrorCode::E102, "Can't find type name")
                        .into());
                }
            }
        }

        let api_prefixes = self.unit.options().functions_api_prefixes_list();
        if !api_prefixes.is_empty() {
            let (api_names, typenames): (Vec<String>, Vec<String>) = cpp_type
                .typenames
                .into_iter()
                .partition(|name| api_prefixes.iter().any(|prefix| name.starts_with(prefix)));
            cpp_type.typenames = typenames;
            let specifiers = std::mem::take(&mut cpp_type.specifiers);
            cpp_type.specifiers = api_names.into_iter().chain(specifiers).collect();
        }
        Ok(cpp_type)
    }

    pub(super) fn push_type(&mut self, element: &SrcmlWrapper, cpp_type: CppType) -> NodeId {
        self.push(element, CppElementComments::default(), CppNode::Type(cpp_type))
    }

    /// Parse a `<decl>`: a variable, a parameter, a member or an enum value.
    pub(super) fn parse_decl(
        &mut self,
        element: &SrcmlWrapper,
        comments: CppElementComments,
        previous_typenames: Option<&[String]>,
    ) -> Step<NodeId> {
        let mut decl = CppDecl::default();
        for child in element.children() {
            match child.tag() {
                "type" => {
                    let cpp_type = self.parse_type(&child, previous_typenames, false)?;
                    decl.cpp_type = Some(self.push_type(&child, cpp_type));
                }
                "name" => {
                    let name_and_array = parse_name(&child);
                    match name_and_array.find('[') {
                        Some(pos) if name_and_array.ends_with(']') => {
                            decl.decl_name = name_and_array[..pos].to_string();
                            decl.c_array_code = name_and_array[pos..].to_string();
                        }
                        _ => decl.decl_name = name_and_array,
                    }
                }
                "init" => decl.initial_value_code = parse_init(&child),
                "argument_list" => {
                    decl.initial_value_via_initializer_list = true;
                    decl.initial_value_code = parse_initializer_list(&child)?;
                }
                // C bit fields
                "range" => decl.bitfield_range = child.verbatim_source(),
                _ => return Err(element.unhandled_tag(&child).into()),
            }
        }
        Ok(self.push(element, comments, CppNode::Decl(decl)))
    }

    /// Parse a `<decl_stmt>`, or the function declaration srcML mistook
    /// for one.
    pub(super) fn parse_decl_stmt_or_function(&mut self, child: &ElementAndComments) -> Step<NodeId> {
        if self.unit.options().fix_brace_init_default_value {
            if let Some(function) = self.function_from_suspicious_decl_stmt(child)? {
                return Ok(function);
            }
        }
        self.parse_decl_stmt(child)
    }

    /// `int a = 1, b[2];`
    ///
    /// The comments of the statement are given to each declaration.
    fn parse_decl_stmt(&mut self, child: &ElementAndComments) -> Step<NodeId> {
        let element = &child.element;
        let mut decls = Vec::new();
        let mut previous_typenames: Option<Vec<String>> = None;
        for decl_element in element.children() {
            if decl_element.tag() != "decl" {
                return Err(element.unhandled_tag(&decl_element).into());
            }
            if decl_element.extract_name_from_xml().is_none() {
                return Err(decl_element
                    .unsupported(ErrorCode::E103, "Encountered decl without name!")
                    .into());
            }
            let decl = self.parse_decl(&decl_element, child.comments.clone(), previous_typenames.as_deref())?;
            previous_typenames = self.unit.decl_type(decl).map(|t| t.typenames.clone());
            decls.push(decl);
        }
        let node = CppNode::DeclStatement(CppDeclStatement { decls });
        Ok(self.push(element, CppElementComments::default(), node))
    }
}
