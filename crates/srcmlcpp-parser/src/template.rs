//! Template specialization of functions, structs and declarations.
//!
//! ```cpp
//! template<typename T> T f(const T& x);
//! // specialized with int:
//! template</*typename T=int*/> int f<int>(const int & x);
//! ```
//!
//! Specializing never modifies the original element: the result is a
//! detached copy, or `None` when the specialization changes nothing.

use std::fmt;

use log::debug;

use crate::ast::{CppNode, CppType, CppUnit, NodeId};

/// One type given to a template parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppTemplateSpecializationPart {
    /// The name of the template parameter (`T`). When empty, the type goes
    /// to the first parameter not yet specialized.
    pub template_name: String,
    /// The type replacing the parameter. It must have exactly one
    /// typename: use `uint` rather than `unsigned int`.
    pub cpp_type: CppType,
}

impl fmt::Display for CppTemplateSpecializationPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.template_name.is_empty() {
            write!(f, "{}", self.cpp_type)
        } else {
            write!(f, "{} -> {}", self.template_name, self.cpp_type)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppTemplateSpecialization {
    pub specializations: Vec<CppTemplateSpecializationPart>,
}

impl CppTemplateSpecialization {
    pub fn from_type(cpp_type: CppType, template_name: &str) -> Self {
        Self {
            specializations: vec![CppTemplateSpecializationPart {
                template_name: template_name.to_string(),
                cpp_type,
            }],
        }
    }

    pub fn from_specializations(specializations: Vec<CppTemplateSpecializationPart>) -> Self {
        Self { specializations }
    }
}

impl CppUnit {
    fn template_of(&self, id: NodeId) -> Option<NodeId> {
        match self.node(id) {
            CppNode::Struct(s) | CppNode::Class(s) => s.template,
            node => node.as_function().and_then(|f| f.template),
        }
    }

    /// The parameters of the template of a function or struct.
    pub fn template_parameters(&self, id: NodeId) -> &[NodeId] {
        let Some(template) = self.template_of(id) else {
            return &[];
        };
        match self.node(template) {
            CppNode::Template(t) => self.parameters(t.parameter_list),
            _ => &[],
        }
    }

    /// The types given so far to the leading template parameters.
    pub fn specialized_template_params(&self, id: NodeId) -> &[CppType] {
        match self.node(id) {
            CppNode::Struct(s) | CppNode::Class(s) => &s.specialized_template_params,
            node => node
                .as_function()
                .map(|f| f.specialized_template_params.as_slice())
                .unwrap_or(&[]),
        }
    }

    fn specialized_template_params_mut(&mut self, id: NodeId) -> Option<&mut Vec<CppType>> {
        match self.node_mut(id) {
            CppNode::Struct(s) | CppNode::Class(s) => Some(&mut s.specialized_template_params),
            node => node.as_function_mut().map(|f| &mut f.specialized_template_params),
        }
    }

    pub fn is_template(&self, id: NodeId) -> bool {
        self.template_of(id).is_some()
    }

    pub fn is_template_fully_specialized(&self, id: NodeId) -> bool {
        self.is_template(id)
            && self.specialized_template_params(id).len() == self.template_parameters(id).len()
    }

    /// A template not fully specialized, including one not specialized at
    /// all.
    pub fn is_template_partially_specialized(&self, id: NodeId) -> bool {
        self.is_template(id) && !self.is_template_fully_specialized(id)
    }

    /// `<int, double>` after a specialization on `int` and `double`, empty
    /// otherwise.
    pub fn str_template_specialization(&self, id: NodeId) -> String {
        let params = self.specialized_template_params(id);
        if params.is_empty() {
            return String::new();
        }
        let params: Vec<String> = params.iter().map(CppType::str_code).collect();
        format!("<{}>", params.join(", "))
    }

    /// The template prefix of a function or struct.
    ///
    /// Once specialized, the prefix is kept as a comment, with the given
    /// types: `template</*typename T=int*/> ` for a function,
    /// `/*template<typename T=int>*/ ` for a struct.
    pub fn str_template(&self, id: NodeId) -> String {
        let parameters = self.template_parameters(id);
        if parameters.is_empty() {
            return String::new();
        }
        let specialized = self.specialized_template_params(id);
        let params: Vec<String> = parameters
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let (template_type, template_name) = match self.node(*p).as_parameter() {
                    Some(p) if p.is_template_param() => (p.template_type.as_str(), p.template_name.as_str()),
                    _ => ("", ""),
                };
                let type_and_name = if template_type.is_empty() {
                    self.str_code(*p)
                } else {
                    format!("{template_type} {template_name}")
                };
                match specialized.get(i) {
                    Some(instantiation) => format!("{type_and_name}={instantiation}"),
                    None => type_and_name,
                }
            })
            .collect();
        let params = params.join(", ");

        if specialized.is_empty() {
            format!("template<{params}> ")
        } else if self.node(id).is_struct() {
            format!("/*template<{params}>*/ ")
        } else {
            format!("template</*{params}*/> ")
        }
    }

    /// Give the unnamed specializations to the next template parameters.
    ///
    /// # Panics
    ///
    /// Panics if an unnamed specialization is given to an element that is
    /// not a template, or that has no parameter left to specialize.
    fn resolve_template_specs(
        &self,
        id: NodeId,
        specs: &CppTemplateSpecialization,
    ) -> (CppTemplateSpecialization, Vec<CppType>) {
        let parameters = self.template_parameters(id);
        let nb_specialized = self.specialized_template_params(id).len();
        let mut resolved = specs.clone();
        let mut new_params = Vec::new();
        for spec in resolved.specializations.iter_mut() {
            if !spec.template_name.is_empty() {
                continue;
            }
            assert!(
                self.is_template(id),
                "cannot give an unnamed template specialization to a non template element"
            );
            let index = nb_specialized + new_params.len();
            let Some(parameter) = parameters.get(index) else {
                panic!("too many template specializations: the template only has {} parameters", parameters.len());
            };
            spec.template_name = self
                .node(*parameter)
                .as_parameter()
                .map(|p| p.template_name.clone())
                .unwrap_or_default();
            new_params.push(spec.cpp_type.clone());
        }
        (resolved, new_params)
    }

    /// A copy of a function, struct, declaration statement, declaration or
    /// type where the template parameters are replaced by the given types.
    ///
    /// Returns `None` when the element does not use any of them. Unnamed
    /// specializations also extend the specialized parameters of a template
    /// function or struct.
    ///
    /// # Panics
    ///
    /// Panics on over-specialization (see
    /// [`is_template_fully_specialized`](Self::is_template_fully_specialized)).
    pub fn with_specialized_template(&mut self, id: NodeId, specs: &CppTemplateSpecialization) -> Option<NodeId> {
        let (specs, new_params) = self.resolve_template_specs(id, specs);
        let checkpoint = self.len();
        let copy = self.deep_clone(id);
        if let Some(params) = self.specialized_template_params_mut(copy) {
            params.extend(new_params);
        }
        if self.specialize_in_place(copy, &specs) {
            let element = self.short_cpp_element_info(id, true);
            debug!(element = element.as_str(); "Specialized template");
            Some(copy)
        } else {
            self.truncate_arena(checkpoint);
            None
        }
    }

    fn specialize_in_place(&mut self, id: NodeId, specs: &CppTemplateSpecialization) -> bool {
        match self.node(id) {
            CppNode::Type(t) => {
                let Some(new_type) = t.with_specialized_template(specs) else {
                    return false;
                };
                *self.node_mut(id) = CppNode::Type(new_type);
                true
            }
            CppNode::Decl(d) => match d.cpp_type {
                Some(cpp_type) => self.specialize_in_place(cpp_type, specs),
                None => false,
            },
            CppNode::DeclStatement(stmt) => {
                let decls = stmt.decls.clone();
                decls
                    .into_iter()
                    .fold(false, |changed, d| self.specialize_in_place(d, specs) || changed)
            }
            CppNode::Struct(s) | CppNode::Class(s) => {
                let sections = self.block_children(s.block).to_vec();
                let mut changed = false;
                for section in sections {
                    if !matches!(self.node(section), CppNode::PublicProtectedPrivate(_)) {
                        continue;
                    }
                    for member in self.block_children(section).to_vec() {
                        let is_specializable = matches!(
                            self.node(member),
                            CppNode::DeclStatement(_) | CppNode::Struct(_) | CppNode::Class(_)
                        ) || self.node(member).is_function();
                        if is_specializable {
                            changed |= self.specialize_in_place(member, specs);
                        }
                    }
                }
                changed
            }
            node => {
                let Some(function) = node.as_function() else {
                    return false;
                };
                let return_type = function.return_type;
                let parameters = self.parameters(function.parameter_list).to_vec();
                let mut changed = false;
                if let Some(return_type) = return_type {
                    changed |= self.specialize_in_place(return_type, specs);
                }
                for parameter in parameters {
                    if let Some(decl) = self.parameter_decl(parameter) {
                        changed |= self.specialize_in_place(decl, specs);
                    }
                }
                changed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{CppDecl, CppFunctionDecl, CppParameter, CppParameterList, CppTemplate},
        comments::CppElementComments,
        options::SrcmlcppOptions,
    };

    fn push(unit: &mut CppUnit, node: CppNode) -> NodeId {
        unit.push(None, CppElementComments::default(), node)
    }

    fn template_param(unit: &mut CppUnit, name: &str) -> NodeId {
        push(
            unit,
            CppNode::Parameter(CppParameter {
                template_type: "typename".to_string(),
                template_name: name.to_string(),
                ..CppParameter::default()
            }),
        )
    }

    /// `template<typename T, typename U> T f(U u);`
    fn template_function(unit: &mut CppUnit) -> NodeId {
        let t = template_param(unit, "T");
        let u = template_param(unit, "U");
        let template_params = push(unit, CppNode::ParameterList(CppParameterList { parameters: vec![t, u] }));
        let template = push(
            unit,
            CppNode::Template(CppTemplate {
                parameter_list: template_params,
            }),
        );
        let u_type = push(unit, CppNode::Type(CppType::from_typenames(&["U"])));
        let u_decl = push(
            unit,
            CppNode::Decl(CppDecl {
                cpp_type: Some(u_type),
                decl_name: "u".to_string(),
                ..CppDecl::default()
            }),
        );
        let u_param = push(
            unit,
            CppNode::Parameter(CppParameter {
                decl: Some(u_decl),
                ..CppParameter::default()
            }),
        );
        let parameter_list = push(unit, CppNode::ParameterList(CppParameterList { parameters: vec![u_param] }));
        let return_type = push(unit, CppNode::Type(CppType::from_typenames(&["T"])));
        let function = push(
            unit,
            CppNode::FunctionDecl(CppFunctionDecl {
                return_type: Some(return_type),
                function_name: "f".to_string(),
                parameter_list,
                template: Some(template),
                ..CppFunctionDecl::default()
            }),
        );
        let root = unit.root();
        unit.add_element(root, function);
        unit.fill_parents(root);
        function
    }

    fn int_spec() -> CppTemplateSpecialization {
        CppTemplateSpecialization::from_type(CppType::from_typenames(&["int"]), "")
    }

    #[test]
    fn test_progressive_specialization() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let f = template_function(&mut unit);
        assert_eq!(unit.str_code(f), "template<typename T, typename U> T f(U u);");
        assert!(unit.is_template_partially_specialized(f));

        let f_int = unit.with_specialized_template(f, &int_spec()).expect("uses T");
        assert_eq!(
            unit.str_code(f_int),
            "template</*typename T=int, typename U*/> int f<int>(U u);"
        );
        assert_eq!(unit.str_code(f), "template<typename T, typename U> T f(U u);");

        let double = CppTemplateSpecialization::from_type(CppType::from_typenames(&["double"]), "");
        let f_int_double = unit.with_specialized_template(f_int, &double).expect("uses U");
        assert_eq!(
            unit.str_code(f_int_double),
            "template</*typename T=int, typename U=double*/> int f<int, double>(double u);"
        );
        assert!(unit.is_template_fully_specialized(f_int_double));
    }

    #[test]
    fn test_named_specialization_not_used() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let f = template_function(&mut unit);
        let len = unit.len();
        let spec = CppTemplateSpecialization::from_type(CppType::from_typenames(&["int"]), "V");
        assert_eq!(unit.with_specialized_template(f, &spec), None);
        assert_eq!(unit.len(), len);
    }

    #[test]
    #[should_panic(expected = "too many template specializations")]
    fn test_over_specialization_panics() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let f = template_function(&mut unit);
        let specs = CppTemplateSpecialization::from_specializations(
            int_spec()
                .specializations
                .into_iter()
                .cycle()
                .take(3)
                .collect(),
        );
        let _ = unit.with_specialized_template(f, &specs);
    }
}
