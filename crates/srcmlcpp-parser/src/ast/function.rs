//! Functions, constructors, their parameters and templates.

use crate::ast::{CppAccessType, CppNode, CppType, CppUnit, NodeId};

/// A function or constructor, declared or defined.
///
/// The same data backs the four function kinds of [`CppNode`]; definitions
/// own an unprocessed `body`, constructors may own a `member_init_list`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppFunctionDecl {
    /// May carry API prefixes and `inline` / `virtual` / `static`.
    /// Absent for constructors, destructors and cast operators.
    pub return_type: Option<NodeId>,
    pub function_name: String,
    pub parameter_list: NodeId,
    /// `const`, `override`, `delete`, `default`...
    pub specifiers: Vec<String>,
    pub template: Option<NodeId>,
    pub is_pure_virtual: bool,
    /// `None` without `noexcept`, `""` for a bare `noexcept`, or the
    /// argument (`(false)`).
    pub noexcept: Option<String>,
    /// Types given to the leading template parameters.
    pub specialized_template_params: Vec<CppType>,
    pub body: Option<NodeId>,
    pub member_init_list: Option<NodeId>,
}

impl CppFunctionDecl {
    pub fn is_noexcept(&self) -> bool {
        let Some(noexcept) = self.noexcept.as_deref() else {
            return false;
        };
        if noexcept.is_empty() {
            return true;
        }
        let mut condition = noexcept.trim();
        if condition.starts_with('(') && condition.ends_with(')') && condition.len() >= 2 {
            condition = condition[1..condition.len() - 1].trim();
        }
        matches!(condition.to_lowercase().as_str(), "true" | "1")
    }

    pub fn has_specifier(&self, specifier: &str) -> bool {
        self.specifiers.iter().any(|s| s == specifier)
    }

    pub fn is_const(&self) -> bool {
        self.has_specifier("const")
    }

    pub fn is_destructor(&self) -> bool {
        self.function_name.starts_with('~')
    }

    pub fn is_operator(&self) -> bool {
        self.function_name.starts_with("operator")
    }

    /// `+` for `operator+`, `int` for `operator int`.
    pub fn operator_name(&self) -> Option<&str> {
        self.function_name
            .strip_prefix("operator")
            .map(str::trim)
    }
}

/// One function parameter, or one template parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppParameter {
    /// The declaration of a function parameter, or of a value template
    /// parameter (`template<int N>`).
    pub decl: Option<NodeId>,
    /// `typename` or `class` for type template parameters.
    pub template_type: String,
    /// `T` in `template<typename T>`.
    pub template_name: String,
    /// `1` in `template<int N = 1>`.
    pub template_init: String,
}

impl CppParameter {
    pub fn is_template_param(&self) -> bool {
        !self.template_type.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppParameterList {
    pub parameters: Vec<NodeId>,
}

/// `template<typename T, int N>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppTemplate {
    pub parameter_list: NodeId,
}

impl CppUnit {
    pub fn function(&self, id: NodeId) -> Option<&CppFunctionDecl> {
        self.node(id).as_function()
    }

    pub fn parameters(&self, parameter_list: NodeId) -> &[NodeId] {
        self.node(parameter_list)
            .as_parameter_list()
            .map(|l| l.parameters.as_slice())
            .unwrap_or(&[])
    }

    /// The parameters of a function.
    pub fn function_parameters(&self, id: NodeId) -> &[NodeId] {
        self.function(id)
            .map(|f| self.parameters(f.parameter_list))
            .unwrap_or(&[])
    }

    pub fn function_return_type(&self, id: NodeId) -> Option<&CppType> {
        self.function(id)
            .and_then(|f| f.return_type)
            .and_then(|t| self.node(t).as_type())
    }

    /// The declaration of a function parameter.
    pub fn parameter_decl(&self, parameter: NodeId) -> Option<NodeId> {
        self.node(parameter).as_parameter().and_then(|p| p.decl)
    }

    pub fn parameter_type(&self, parameter: NodeId) -> Option<&CppType> {
        self.parameter_decl(parameter).and_then(|d| self.decl_type(d))
    }

    /// The type of a parameter as C++ code.
    pub fn parameter_full_type(&self, parameter: NodeId) -> String {
        self.parameter_type(parameter)
            .map(CppType::str_code)
            .unwrap_or_default()
    }

    pub fn parameter_has_default_value(&self, parameter: NodeId) -> bool {
        self.parameter_decl(parameter)
            .and_then(|d| self.decl(d))
            .is_some_and(|d| d.has_initial_value())
    }

    pub fn parameter_default_value(&self, parameter: NodeId) -> String {
        self.parameter_decl(parameter)
            .and_then(|d| self.decl(d))
            .map(|d| d.initial_value_code.clone())
            .unwrap_or_default()
    }

    pub fn parameter_variable_name(&self, parameter: NodeId) -> String {
        self.parameter_decl(parameter)
            .and_then(|d| self.decl(d))
            .map(|d| d.decl_name.clone())
            .unwrap_or_default()
    }

    pub fn contains_pointer_to_pointer_param(&self, parameter_list: NodeId) -> bool {
        self.parameters(parameter_list)
            .iter()
            .any(|p| self.parameter_type(*p).is_some_and(|t| t.count_modifier("*") == 2))
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub fn qualified_function_name(&self, id: NodeId) -> String {
        let name = self.function(id).map(|f| f.function_name.as_str()).unwrap_or_default();
        self.cpp_scope(id, false).qualified_name(name)
    }

    /// `f<int>` for a specialized template function.
    pub fn function_name_with_specialization(&self, id: NodeId) -> String {
        let name = self.function(id).map(|f| f.function_name.as_str()).unwrap_or_default();
        format!("{name}{}", self.str_template_specialization(id))
    }

    pub fn qualified_function_name_with_specialization(&self, id: NodeId) -> String {
        format!("{}{}", self.qualified_function_name(id), self.str_template_specialization(id))
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Whether the function is declared inside a struct or class.
    pub fn is_method(&self, id: NodeId) -> bool {
        self.parent(id)
            .is_some_and(|p| matches!(self.node(p), CppNode::PublicProtectedPrivate(_)))
    }

    pub fn method_access_type(&self, id: NodeId) -> Option<CppAccessType> {
        let parent = self.parent(id)?;
        self.node(parent).as_ppp().map(|p| p.access_type)
    }

    /// The struct owning a method: access section, then block, then struct.
    pub fn parent_struct_if_method(&self, id: NodeId) -> Option<NodeId> {
        if !self.is_method(id) {
            return None;
        }
        let block = self.parent(self.parent(id)?)?;
        self.parent(block).filter(|s| self.node(*s).is_struct())
    }

    pub fn parent_struct_name_if_method(&self, id: NodeId) -> Option<&str> {
        self.parent_struct_if_method(id)
            .and_then(|s| self.node(s).as_struct())
            .map(|s| s.class_name.as_str())
    }

    pub fn is_virtual_method(&self, id: NodeId) -> bool {
        let Some(function) = self.function(id) else {
            return false;
        };
        if !self.is_method(id) {
            return false;
        }
        let Some(return_type) = self.function_return_type(id) else {
            return false;
        };
        return_type.has_specifier("virtual") || function.has_specifier("override")
    }

    pub fn is_overloaded_method(&self, id: NodeId) -> bool {
        let (Some(function), Some(parent_struct)) = (self.function(id), self.parent_struct_if_method(id)) else {
            return false;
        };
        self.get_methods_with_name(parent_struct, &function.function_name).len() >= 2
    }

    pub fn is_constructor(&self, id: NodeId) -> bool {
        match (self.function(id), self.parent_struct_name_if_method(id)) {
            (Some(function), Some(struct_name)) => function.function_name == struct_name,
            _ => false,
        }
    }

    pub fn is_destructor(&self, id: NodeId) -> bool {
        self.function(id).is_some_and(CppFunctionDecl::is_destructor)
    }

    /// A constructor without parameters.
    pub fn is_default_constructor_zero_param(&self, id: NodeId) -> bool {
        self.is_constructor(id) && self.function_parameters(id).is_empty()
    }

    /// A constructor callable without arguments.
    pub fn is_default_constructor(&self, id: NodeId) -> bool {
        self.is_constructor(id)
            && self
                .function_parameters(id)
                .iter()
                .all(|p| self.parameter_has_default_value(*p))
    }

    /// `S(const S&)` or `S(S)`.
    pub fn is_copy_constructor(&self, id: NodeId) -> bool {
        if !self.is_constructor(id) {
            return false;
        }
        let parameters = self.function_parameters(id);
        if parameters.len() != 1 {
            return false;
        }
        let (Some(struct_name), Some(param_type)) = (
            self.parent_struct_name_if_method(id),
            self.parameter_type(parameters[0]),
        ) else {
            return false;
        };
        let is_same_type = param_type.typenames == [struct_name];
        let is_const_ref = param_type.has_specifier("const") && param_type.modifiers == ["&"];
        let is_pass_by_copy = param_type.specifiers.is_empty() && param_type.modifiers.is_empty();
        is_same_type && (is_const_ref || is_pass_by_copy)
    }

    pub fn is_static_function(&self, id: NodeId) -> bool {
        self.function_return_type(id).is_some_and(CppType::is_static)
    }

    pub fn is_static_method(&self, id: NodeId) -> bool {
        self.is_method(id) && self.is_static_function(id)
    }

    // =========================================================================
    // Return type
    // =========================================================================

    /// The return type without API prefixes, `virtual` or `inline`. Empty
    /// for destructors and constructors.
    pub fn str_full_return_type(&self, id: NodeId) -> String {
        let is_destructor = self.function(id).is_some_and(CppFunctionDecl::is_destructor);
        if is_destructor {
            return String::new();
        }
        let Some(return_type) = self.function_return_type(id) else {
            return String::new();
        };
        let prefixes = self.options().functions_api_prefixes_list();
        let mut full = return_type.str_return_type(&prefixes);
        for prefix in &prefixes {
            full = full.replace(&format!("{prefix} "), "");
        }
        full
    }

    pub fn returns_pointer(&self, id: NodeId) -> bool {
        self.function_return_type(id).is_some_and(|t| t.modifiers == ["*"])
    }

    pub fn returns_pointer_to_pointer(&self, id: NodeId) -> bool {
        self.function_return_type(id).is_some_and(|t| t.count_modifier("*") == 2)
    }

    pub fn returns_reference(&self, id: NodeId) -> bool {
        self.function_return_type(id).is_some_and(|t| t.modifiers == ["&"])
    }

    pub fn returns_void(&self, id: NodeId) -> bool {
        self.str_full_return_type(id) == "void"
    }

    /// `auto f()`.
    pub fn is_inferred_return_type(&self, id: NodeId) -> bool {
        self.function_return_type(id).is_some_and(CppType::is_inferred_type)
    }

    /// `auto f() -> int`.
    pub fn is_arrow_notation_return_type(&self, id: NodeId) -> bool {
        if self.is_inferred_return_type(id) {
            return false;
        }
        self.function_return_type(id)
            .and_then(|t| t.typenames.first())
            .is_some_and(|first| first == "auto")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noexcept() {
        let mut f = CppFunctionDecl::default();
        assert!(!f.is_noexcept());
        f.noexcept = Some(String::new());
        assert!(f.is_noexcept());
        f.noexcept = Some("(false)".to_string());
        assert!(!f.is_noexcept());
        f.noexcept = Some("( true )".to_string());
        assert!(f.is_noexcept());
        f.noexcept = Some("(is_nothrow<T>())".to_string());
        assert!(!f.is_noexcept());
    }

    #[test]
    fn test_operator_name() {
        let f = CppFunctionDecl {
            function_name: "operator+=".to_string(),
            ..CppFunctionDecl::default()
        };
        assert!(f.is_operator());
        assert_eq!(f.operator_name(), Some("+="));
        let cast = CppFunctionDecl {
            function_name: "operator int".to_string(),
            ..CppFunctionDecl::default()
        };
        assert_eq!(cast.operator_name(), Some("int"));
    }
}
