//! Functions, constructors, parameter lists and templates.

use crate::{
    ast::{CppFunctionDecl, CppNode, CppParameter, CppParameterList, CppTemplate, CppType, NodeId},
    comments::{CppElementComments, ElementAndComments, remove_comment_markers},
    error::{ErrorCode, WarningType},
    parse::{
        Parser, Step,
        types::{parse_init, parse_name},
    },
    wrapper::SrcmlWrapper,
};

/// `operator+` or `operator bool`.
fn operator_function_name(name: &SrcmlWrapper) -> Step<String> {
    let sub_names = name.children_with_tag("name");
    let [operator] = sub_names.as_slice() else {
        return Err(name.malformed("an operator name should have exactly one sub name").into());
    };
    let symbol = parse_name(operator);
    let needs_space = symbol
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    Ok(if needs_space {
        format!("operator {symbol}")
    } else {
        format!("operator{symbol}")
    })
}

impl Parser<'_> {
    /// Parse a `<function_decl>`, `<function>` or their destructor forms.
    ///
    /// `make_node` chooses between a declaration and a definition; the
    /// body of a definition is kept as unprocessed code.
    pub(super) fn parse_function_decl(
        &mut self,
        child: &ElementAndComments,
        make_node: fn(CppFunctionDecl) -> CppNode,
    ) -> Step<NodeId> {
        let element = &child.element;
        let is_definition = matches!(element.tag(), "function" | "destructor");
        let is_operator = element.attribute("type") == Some("operator");
        let mut comments = child.comments.clone();
        let mut function = CppFunctionDecl::default();
        let mut return_type: Option<(SrcmlWrapper, CppType)> = None;
        let mut parameter_list = None;

        for part in element.children() {
            match part.tag() {
                "type" => match return_type.as_mut() {
                    // `auto f() -> int`: the trailing type is appended.
                    Some((_, cpp_type)) if !cpp_type.typenames.is_empty() => {
                        let additional = self.parse_type(&part, None, false)?;
                        cpp_type.typenames.extend(additional.typenames);
                    }
                    _ => {
                        let cpp_type = self.parse_type(&part, None, is_operator)?;
                        return_type = Some((part.clone(), cpp_type));
                    }
                },
                "name" => {
                    function.function_name = parse_name(&part);
                    if function.function_name == "operator" {
                        function.function_name = operator_function_name(&part)?;
                    }
                }
                "parameter_list" => parameter_list = Some(self.parse_parameter_list(&part)?),
                "specifier" => {
                    let text = part.text().ok_or_else(|| part.malformed("empty specifier"))?;
                    function.specifiers.push(text.to_string());
                }
                // compiler attributes, such as [[nodiscard]]
                "attribute" => {}
                "template" => function.template = Some(self.parse_template(&part)?),
                "block" => {
                    if is_definition {
                        function.body = Some(self.push_opaque(&part));
                    }
                }
                "modifier" => {
                    return Err(part
                        .unsupported(ErrorCode::E100, "C style function pointers are poorly supported")
                        .into());
                }
                "comment" => {
                    if let Some(text) = part.text() {
                        comments.add_eol_comment(&remove_comment_markers(text));
                    }
                }
                // pure virtual: `= 0`
                "literal" => {
                    if part.text().map(str::trim) != Some("0") {
                        return Err(part
                            .malformed("unhandled literal (was expecting '=0' for a pure virtual function)")
                            .into());
                    }
                    function.is_pure_virtual = true;
                }
                "noexcept" => {
                    let condition = part
                        .child_with_tag("argument_list")
                        .map(|args| args.verbatim_source())
                        .unwrap_or_default();
                    function.noexcept = Some(condition);
                }
                _ => return Err(element.unhandled_tag(&part).into()),
            }
        }

        function.return_type = return_type.map(|(part, cpp_type)| self.push_type(&part, cpp_type));
        function.parameter_list = match parameter_list {
            Some(parameter_list) => parameter_list,
            None => self.push_empty_parameter_list(element),
        };
        Ok(self.push(element, comments, make_node(function)))
    }

    /// Parse a `<constructor_decl>` or `<constructor>`.
    pub(super) fn parse_constructor(
        &mut self,
        child: &ElementAndComments,
        make_node: fn(CppFunctionDecl) -> CppNode,
    ) -> Step<NodeId> {
        let element = &child.element;
        let is_definition = element.tag() == "constructor";
        let mut comments = child.comments.clone();
        let mut constructor = CppFunctionDecl::default();
        let mut parameter_list = None;

        for part in element.children() {
            match part.tag() {
                "name" => constructor.function_name = parse_name(&part),
                "parameter_list" => parameter_list = Some(self.parse_parameter_list(&part)?),
                "specifier" => {
                    let text = part.text().ok_or_else(|| part.malformed("empty specifier"))?;
                    constructor.specifiers.push(text.to_string());
                }
                "comment" => {
                    if let Some(text) = part.text() {
                        comments.add_eol_comment(&remove_comment_markers(text));
                    }
                }
                "attribute" => {}
                "block" => {
                    if is_definition {
                        constructor.body = Some(self.push_opaque(&part));
                    }
                }
                "member_init_list" => {
                    if is_definition {
                        constructor.member_init_list = Some(self.push_opaque(&part));
                    }
                }
                _ => return Err(element.unhandled_tag(&part).into()),
            }
        }

        constructor.parameter_list = match parameter_list {
            Some(parameter_list) => parameter_list,
            None => self.push_empty_parameter_list(element),
        };
        Ok(self.push(element, comments, make_node(constructor)))
    }

    fn push_empty_parameter_list(&mut self, element: &SrcmlWrapper) -> NodeId {
        let node = CppNode::ParameterList(CppParameterList::default());
        self.push(element, CppElementComments::default(), node)
    }

    /// Parse a `<parameter_list>`, of a function or of a template.
    ///
    /// Comments are skipped; other unexpected tags are reported and skipped.
    pub(super) fn parse_parameter_list(&mut self, element: &SrcmlWrapper) -> Step<NodeId> {
        let mut parameters = Vec::new();
        for child in element.children() {
            match child.tag() {
                "parameter" => parameters.push(self.parse_parameter(&child)?),
                "comment" => {}
                tag => {
                    let message = format!("parse_parameter_list unhandled tag {tag}");
                    self.warn_at(element, WarningType::SrcmlcppUnhandledTagParameterList, &message);
                }
            }
        }
        let node = CppNode::ParameterList(CppParameterList { parameters });
        Ok(self.push(element, CppElementComments::default(), node))
    }

    /// A function parameter (`int a = 1`), or a template parameter
    /// (`typename T`, `int N = 3`).
    fn parse_parameter(&mut self, element: &SrcmlWrapper) -> Step<NodeId> {
        let mut parameter = CppParameter::default();
        for child in element.children() {
            match child.tag() {
                "decl" => {
                    parameter.decl = Some(self.parse_decl(&child, CppElementComments::default(), None)?);
                }
                // `typename` or `class`, for template parameters
                "type" => {
                    parameter.template_type = child
                        .extract_name_from_xml()
                        .ok_or_else(|| child.malformed("template parameter without typename"))?;
                }
                "name" => parameter.template_name = parse_name(&child),
                "init" => parameter.template_init = parse_init(&child),
                "function_decl" => {
                    return Err(child
                        .unsupported(ErrorCode::E100, "Can't use a function_decl as a param.")
                        .into());
                }
                _ => return Err(element.unhandled_tag(&child).into()),
            }
        }
        Ok(self.push(element, CppElementComments::default(), CppNode::Parameter(parameter)))
    }

    /// `template<typename T, int N>`
    pub(super) fn parse_template(&mut self, element: &SrcmlWrapper) -> Step<NodeId> {
        let mut parameter_list = None;
        for child in element.children() {
            match child.tag() {
                "parameter_list" => parameter_list = Some(self.parse_parameter_list(&child)?),
                _ => return Err(element.unhandled_tag(&child).into()),
            }
        }
        let parameter_list = match parameter_list {
            Some(parameter_list) => parameter_list,
            None => self.push_empty_parameter_list(element),
        };
        let node = CppNode::Template(CppTemplate { parameter_list });
        Ok(self.push(element, CppElementComments::default(), node))
    }
}
