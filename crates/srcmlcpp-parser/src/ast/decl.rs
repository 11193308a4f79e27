//! Variable declarations and declaration statements.

use crate::ast::{CppNode, CppType, CppUnit, NodeId};

/// A declaration: `int a[10] = {0}`, an enum value, or the declaration of
/// a function parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppDecl {
    /// Absent for enum values.
    pub cpp_type: Option<NodeId>,
    pub decl_name: String,
    /// `[10]`, `[]`, or empty.
    pub c_array_code: String,
    /// Initial or default value.
    pub initial_value_code: String,
    /// The value was given as `int a{1, 2}`.
    pub initial_value_via_initializer_list: bool,
    /// The width of a bitfield member.
    pub bitfield_range: String,
}

impl CppDecl {
    pub fn is_bitfield(&self) -> bool {
        !self.bitfield_range.is_empty()
    }

    /// Whether this is a C array, sized (`int v[4]`) or not (`int v[]`).
    pub fn is_c_array(&self) -> bool {
        !self.c_array_code.is_empty()
    }

    /// `COUNT` for `int v[COUNT]`, an empty string for `int v[]`.
    pub fn c_array_size_as_str(&self) -> Option<&str> {
        if !self.is_c_array() {
            return None;
        }
        let start = self.c_array_code.find('[')? + 1;
        let end = self.c_array_code.len().saturating_sub(1).max(start);
        self.c_array_code.get(start..end)
    }

    pub fn has_initial_value(&self) -> bool {
        !self.initial_value_code.is_empty()
    }
}

/// `int a = 1, b;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppDeclStatement {
    pub decls: Vec<NodeId>,
}

/// Where a declaration occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CppDeclContext {
    /// Inside a declaration statement.
    VarDecl,
    /// A value of an enum.
    EnumDecl,
    /// A parameter of a function.
    ParamDecl,
    Unknown,
}

impl CppUnit {
    pub fn decl(&self, id: NodeId) -> Option<&CppDecl> {
        self.node(id).as_decl()
    }

    /// The type of a declaration, if it has one.
    pub fn decl_type(&self, id: NodeId) -> Option<&CppType> {
        self.decl(id)
            .and_then(|d| d.cpp_type)
            .and_then(|t| self.node(t).as_type())
    }

    pub fn decl_context(&self, id: NodeId) -> CppDeclContext {
        let Some(parent) = self.parent(id) else {
            return CppDeclContext::Unknown;
        };
        match self.node(parent) {
            CppNode::DeclStatement(_) => CppDeclContext::VarDecl,
            CppNode::Block(_) if self.parent_enum_if_applicable(id).is_some() => {
                CppDeclContext::EnumDecl
            }
            CppNode::Parameter(_) => {
                let is_function_param = self
                    .parent(parent)
                    .filter(|list| matches!(self.node(*list), CppNode::ParameterList(_)))
                    .and_then(|list| self.parent(list))
                    .is_some_and(|f| self.node(f).is_function());
                if is_function_param {
                    CppDeclContext::ParamDecl
                } else {
                    CppDeclContext::Unknown
                }
            }
            _ => CppDeclContext::Unknown,
        }
    }

    /// The enum of an enum value declaration.
    pub fn parent_enum_if_applicable(&self, id: NodeId) -> Option<NodeId> {
        if !matches!(self.node(id), CppNode::Decl(_)) {
            return None;
        }
        let block = self.parent(id)?;
        if !matches!(self.node(block), CppNode::Block(_)) {
            return None;
        }
        self.parent(block)
            .filter(|e| matches!(self.node(*e), CppNode::Enum(_)))
    }

    pub fn decl_has_name_or_ellipsis(&self, id: NodeId) -> bool {
        let Some(decl) = self.decl(id) else {
            return false;
        };
        !decl.decl_name.is_empty() || self.decl_type(id).is_some_and(|t| t.has_modifier("..."))
    }

    /// Whether the declaration looks like a list of C strings:
    /// `const char * const items[]`, `const char ** items`.
    pub fn decl_is_c_string_list_ptr(&self, id: NodeId) -> bool {
        let (Some(decl), Some(cpp_type)) = (self.decl(id), self.decl_type(id)) else {
            return false;
        };
        let is_default_init = matches!(decl.initial_value_code.as_str(), "" | "NULL" | "nullptr");
        let nb_indirections = cpp_type.count_modifier("*") + usize::from(decl.is_c_array());
        cpp_type.has_specifier("const")
            && cpp_type.typenames == ["char"]
            && nb_indirections == 2
            && is_default_init
    }

    pub fn decl_is_const(&self, id: NodeId) -> bool {
        self.decl_type(id).is_some_and(|t| t.has_specifier("const"))
    }

    /// The array size, resolved through the named number macros.
    pub fn decl_c_array_size_as_int(&self, id: NodeId) -> Option<i64> {
        let size = self.decl(id)?.c_array_size_as_str()?;
        self.options().int_from_str_or_named_number_macros(size)
    }

    pub fn decl_is_c_array_known_fixed_size(&self, id: NodeId) -> bool {
        self.decl_c_array_size_as_int(id).is_some()
    }

    /// `int a[];`
    pub fn decl_is_c_array_no_size(&self, id: NodeId) -> bool {
        self.decl(id)
            .and_then(CppDecl::c_array_size_as_str)
            .is_some_and(|size| size.trim().is_empty())
    }

    /// `int a[COUNT];` where `COUNT` is not a known number.
    pub fn decl_is_c_array_fixed_size_unparsable(&self, id: NodeId) -> bool {
        let has_size = self
            .decl(id)
            .and_then(CppDecl::c_array_size_as_str)
            .is_some_and(|size| !size.trim().is_empty());
        has_size && self.decl_c_array_size_as_int(id).is_none()
    }

    /// The declarations of a declaration statement.
    pub fn decl_statement_decls(&self, id: NodeId) -> &[NodeId] {
        match self.node(id) {
            CppNode::DeclStatement(s) => &s.decls,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_array_size() {
        let decl = CppDecl {
            decl_name: "v".to_string(),
            c_array_code: "[COUNT]".to_string(),
            ..CppDecl::default()
        };
        assert!(decl.is_c_array());
        assert_eq!(decl.c_array_size_as_str(), Some("COUNT"));

        let no_size = CppDecl {
            c_array_code: "[]".to_string(),
            ..CppDecl::default()
        };
        assert_eq!(no_size.c_array_size_as_str(), Some(""));
        assert_eq!(CppDecl::default().c_array_size_as_str(), None);
    }
}
