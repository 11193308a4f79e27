//! Structs, classes and their base classes.

use crate::{
    ast::{CppAccessType, CppNode, CppPublicProtectedPrivate, CppType, CppUnit, NodeId},
    comments::CppElementComments,
};

/// A struct or class definition.
///
/// The block only holds access sections
/// ([`CppNode::PublicProtectedPrivate`]): srcML adds a default one for the
/// members declared before the first access specifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppStruct {
    pub class_name: String,
    pub super_list: Option<NodeId>,
    pub block: NodeId,
    pub template: Option<NodeId>,
    /// `final`
    pub specifier: String,
    /// An export macro, as in `struct MY_API Foo`.
    pub macro_name: String,
    /// Types given to the leading template parameters.
    pub specialized_template_params: Vec<CppType>,
}

/// One base class: `public Base`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppSuper {
    /// `public`, `protected`, `private` or empty.
    pub specifier: String,
    pub superclass_name: String,
}

impl CppSuper {
    pub fn str_code(&self) -> String {
        if self.specifier.is_empty() {
            self.superclass_name.clone()
        } else {
            format!("{} {}", self.specifier, self.superclass_name)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppSuperList {
    pub supers: Vec<NodeId>,
}

impl CppUnit {
    pub fn cpp_struct(&self, id: NodeId) -> Option<&CppStruct> {
        self.node(id).as_struct()
    }

    pub fn is_final(&self, id: NodeId) -> bool {
        self.cpp_struct(id).is_some_and(|s| s.specifier == "final")
    }

    pub fn qualified_class_name(&self, id: NodeId) -> String {
        let name = self.cpp_struct(id).map(|s| s.class_name.as_str()).unwrap_or_default();
        self.cpp_scope(id, false).qualified_name(name)
    }

    /// `Foo<int>` for a specialized template struct.
    pub fn class_name_with_specialization(&self, id: NodeId) -> String {
        let name = self.cpp_struct(id).map(|s| s.class_name.as_str()).unwrap_or_default();
        format!("{name}{}", self.str_template_specialization(id))
    }

    pub fn qualified_class_name_with_specialization(&self, id: NodeId) -> String {
        format!("{}{}", self.qualified_class_name(id), self.str_template_specialization(id))
    }

    fn struct_supers(&self, id: NodeId) -> Vec<&CppSuper> {
        let Some(super_list) = self.cpp_struct(id).and_then(|s| s.super_list) else {
            return Vec::new();
        };
        match self.node(super_list) {
            CppNode::SuperList(list) => list
                .supers
                .iter()
                .filter_map(|s| match self.node(*s) {
                    CppNode::Super(cpp_super) => Some(cpp_super),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn has_base_classes(&self, id: NodeId) -> bool {
        !self.struct_supers(id).is_empty()
    }

    /// The base classes defined in the same unit, with their inheritance
    /// access.
    pub fn base_classes(&self, id: NodeId) -> Vec<(CppAccessType, NodeId)> {
        let scope = self.cpp_scope(id, false);
        let root = self.root_of(id);
        self.struct_supers(id)
            .into_iter()
            .filter_map(|cpp_super| {
                let access = CppAccessType::from_name(&cpp_super.specifier)?;
                let base = self.find_struct_or_class(root, &cpp_super.superclass_name, &scope)?;
                Some((access, base))
            })
            .collect()
    }

    // =========================================================================
    // Access sections and members
    // =========================================================================

    /// The access sections of a struct, all of them with `None`.
    pub fn get_access_blocks(&self, id: NodeId, access_type: Option<CppAccessType>) -> Vec<NodeId> {
        let Some(cpp_struct) = self.cpp_struct(id) else {
            return Vec::new();
        };
        self.block_children(cpp_struct.block)
            .iter()
            .copied()
            .filter(|child| {
                self.node(*child)
                    .as_ppp()
                    .is_some_and(|p| access_type.is_none_or(|a| a == p.access_type))
            })
            .collect()
    }

    /// The member variables with their access.
    pub fn get_members_with_access_type(&self, id: NodeId) -> Vec<(CppAccessType, NodeId)> {
        let mut members = Vec::new();
        for ppp in self.get_access_blocks(id, None) {
            let Some(access) = self.node(ppp).as_ppp().map(|p| p.access_type) else {
                continue;
            };
            for child in self.block_children(ppp) {
                for decl in self.decl_statement_decls(*child) {
                    members.push((access, *decl));
                }
            }
        }
        members
    }

    pub fn get_members(&self, id: NodeId, access_type: Option<CppAccessType>) -> Vec<NodeId> {
        self.get_members_with_access_type(id)
            .into_iter()
            .filter(|(access, _)| access_type.is_none_or(|a| a == *access))
            .map(|(_, decl)| decl)
            .collect()
    }

    /// Members, methods and inner types, optionally filtered by access and
    /// by kind.
    pub fn get_elements(
        &self,
        id: NodeId,
        access_type: Option<CppAccessType>,
        filter: Option<&dyn Fn(&CppNode) -> bool>,
    ) -> Vec<NodeId> {
        self.get_access_blocks(id, access_type)
            .into_iter()
            .flat_map(|ppp| self.block_children(ppp).to_vec())
            .filter(|child| filter.is_none_or(|f| f(self.node(*child))))
            .collect()
    }

    /// Methods, constructors and destructors.
    pub fn get_methods(&self, id: NodeId) -> Vec<NodeId> {
        let is_function: &dyn Fn(&CppNode) -> bool = &CppNode::is_function;
        self.get_elements(id, None, Some(is_function))
    }

    pub fn get_methods_with_name(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.get_methods(id)
            .into_iter()
            .filter(|m| self.function(*m).is_some_and(|f| f.function_name == name))
            .collect()
    }

    /// Append an explicit access section to a struct.
    pub fn add_access_block(
        &mut self,
        id: NodeId,
        access_type: CppAccessType,
        comments: Option<CppElementComments>,
    ) -> Option<NodeId> {
        let block = self.cpp_struct(id)?.block;
        let ppp = self.push(
            None,
            comments.unwrap_or_default(),
            CppNode::PublicProtectedPrivate(CppPublicProtectedPrivate {
                access_type,
                is_default_access: false,
                children: Vec::new(),
            }),
        );
        self.add_element(block, ppp);
        Some(ppp)
    }

    /// Move the detached function `function` into the last section of the
    /// struct with the given access, creating it if needed.
    pub fn add_method(&mut self, id: NodeId, function: NodeId, access_type: CppAccessType) -> Option<NodeId> {
        let ppp = match self.get_access_blocks(id, Some(access_type)).last() {
            Some(ppp) => *ppp,
            None => self.add_access_block(id, access_type, None)?,
        };
        self.add_element(ppp, function);
        self.fill_parents(function);
        self.clear_scope_caches();
        Some(function)
    }

    // =========================================================================
    // Constructors and destructors
    // =========================================================================

    fn constructors(&self, id: NodeId) -> Vec<NodeId> {
        self.get_methods(id)
            .into_iter()
            .filter(|m| self.is_constructor(*m))
            .collect()
    }

    pub fn has_user_defined_default_constructor_zero_param(&self, id: NodeId) -> bool {
        self.get_methods(id)
            .into_iter()
            .any(|m| self.is_default_constructor_zero_param(m))
    }

    pub fn has_user_defined_default_constructor_non_zero_param(&self, id: NodeId) -> bool {
        self.constructors(id)
            .into_iter()
            .any(|m| !self.function_parameters(m).is_empty())
    }

    pub fn has_user_defined_default_constructor(&self, id: NodeId) -> bool {
        self.get_methods(id).into_iter().any(|m| self.is_default_constructor(m))
    }

    /// Whether the struct declares a constructor.
    ///
    /// A lone `S() = default;` does not count.
    pub fn has_user_defined_constructor(&self, id: NodeId) -> bool {
        let constructors = self.constructors(id);
        match constructors.as_slice() {
            [] => false,
            [single] => {
                let is_defaulted = self.function(*single).is_some_and(|f| f.has_specifier("default"));
                !(self.is_default_constructor_zero_param(*single) && is_defaulted)
            }
            _ => true,
        }
    }

    pub fn has_deleted_default_constructor(&self, id: NodeId) -> bool {
        self.get_methods(id).into_iter().any(|m| {
            self.is_default_constructor(m) && self.function(m).is_some_and(|f| f.has_specifier("delete"))
        })
    }

    pub fn get_user_defined_copy_constructor(&self, id: NodeId) -> Option<NodeId> {
        self.get_methods(id).into_iter().find(|m| self.is_copy_constructor(*m))
    }

    /// Whether the user defined copy constructor is public and not deleted.
    pub fn is_user_defined_copy_constructor_part_of_api(&self, id: NodeId) -> bool {
        let Some(copy_ctor) = self.get_user_defined_copy_constructor(id) else {
            return false;
        };
        self.method_access_type(copy_ctor) == Some(CppAccessType::Public)
            && !self.function(copy_ctor).is_some_and(|f| f.has_specifier("delete"))
    }

    pub fn has_private_destructor(&self, id: NodeId) -> bool {
        self.get_methods(id).into_iter().any(|m| {
            self.is_destructor(m) && self.method_access_type(m) == Some(CppAccessType::Private)
        })
    }

    // =========================================================================
    // Virtual methods
    // =========================================================================

    /// Whether the struct has at least one virtual method.
    pub fn is_virtual(&self, id: NodeId) -> bool {
        self.get_methods(id).into_iter().any(|m| self.is_virtual_method(m))
    }

    /// The virtual methods of the struct, followed by those of its base
    /// classes that it does not override.
    pub fn virtual_methods(&self, id: NodeId, include_inherited_virtual_methods: bool) -> Vec<NodeId> {
        let mut visited = vec![id];
        self.collect_virtual_methods(id, include_inherited_virtual_methods, &mut visited)
    }

    fn collect_virtual_methods(&self, id: NodeId, include_inherited: bool, visited: &mut Vec<NodeId>) -> Vec<NodeId> {
        let mut methods: Vec<NodeId> = self
            .get_methods(id)
            .into_iter()
            .filter(|m| self.is_virtual_method(*m))
            .collect();
        if !include_inherited {
            return methods;
        }
        for (_, base) in self.base_classes(id) {
            if visited.contains(&base) {
                continue;
            }
            visited.push(base);
            for base_method in self.collect_virtual_methods(base, include_inherited, visited) {
                if !self.is_method_already_present(&methods, base_method) {
                    methods.push(base_method);
                }
            }
        }
        methods
    }

    fn is_method_already_present(&self, methods: &[NodeId], method: NodeId) -> bool {
        let Some(function) = self.function(method) else {
            return false;
        };
        let types = self.str_types_names_only(function.parameter_list);
        methods.iter().any(|present| {
            self.function(*present).is_some_and(|p| {
                p.function_name == function.function_name
                    && self.str_types_names_only(p.parameter_list) == types
            })
        })
    }
}
