//! Blocks, namespaces and access sections, and the queries on their content.

use crate::{
    ast::{CppAccessType, CppNode, CppUnit, NodeId},
    scope::CppScope,
};

/// An ordered list of elements: the content of a unit, a namespace, an
/// enum, or of a struct (whose children are access sections).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppBlock {
    pub children: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppNamespace {
    pub ns_name: String,
    pub block: NodeId,
}

/// A `public:`, `protected:` or `private:` section of a struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppPublicProtectedPrivate {
    pub access_type: CppAccessType,
    /// The section was added by srcML for the members declared before any
    /// access specifier.
    pub is_default_access: bool,
    pub children: Vec<NodeId>,
}

impl CppUnit {
    fn elements_matching(&self, id: NodeId, wanted: impl Fn(&CppNode) -> bool) -> Vec<NodeId> {
        self.all_cpp_elements_recursive(id)
            .into_iter()
            .filter(|e| wanted(self.node(*e)))
            .collect()
    }

    /// The functions directly inside a block.
    pub fn all_functions(&self, block: NodeId) -> Vec<NodeId> {
        self.block_children(block)
            .iter()
            .copied()
            .filter(|c| self.node(*c).is_function())
            .collect()
    }

    pub fn all_functions_with_name(&self, block: NodeId, name: &str) -> Vec<NodeId> {
        self.all_functions(block)
            .into_iter()
            .filter(|f| self.function(*f).is_some_and(|f| f.function_name == name))
            .collect()
    }

    /// Whether `function` shares its name with another function of the block.
    pub fn is_function_overloaded(&self, block: NodeId, function: NodeId) -> bool {
        let Some(name) = self.function(function).map(|f| f.function_name.as_str()) else {
            return false;
        };
        self.all_functions_with_name(block, name).len() >= 2
    }

    /// The functions below `id`, in any nesting.
    pub fn all_functions_recursive(&self, id: NodeId) -> Vec<NodeId> {
        self.elements_matching(id, CppNode::is_function)
    }

    pub fn all_structs_recursive(&self, id: NodeId) -> Vec<NodeId> {
        self.elements_matching(id, CppNode::is_struct)
    }

    pub fn all_decl_statement_recursive(&self, id: NodeId) -> Vec<NodeId> {
        self.elements_matching(id, |n| matches!(n, CppNode::DeclStatement(_)))
    }

    /// Declarations of variables, parameters and enum values.
    pub fn all_decl_recursive(&self, id: NodeId) -> Vec<NodeId> {
        self.elements_matching(id, |n| matches!(n, CppNode::Decl(_)))
    }

    /// Find the struct named `class_name_with_scope` (possibly with scopes,
    /// as `Inner::Foo`) as seen from `current_scope`.
    pub fn find_struct_or_class(
        &self,
        block: NodeId,
        class_name_with_scope: &str,
        current_scope: &CppScope,
    ) -> Option<NodeId> {
        let (class_scope, class_name) = match class_name_with_scope.rsplit_once("::") {
            Some((scope, name)) => (scope, name),
            None => ("", class_name_with_scope),
        };
        let mut searched_scopes = vec![class_scope.to_string()];
        if !current_scope.is_root() {
            searched_scopes.push(format!("{}::{class_scope}", current_scope.str_cpp()));
        }
        self.all_structs_recursive(block).into_iter().find(|s| {
            let is_name_equal = self.cpp_struct(*s).is_some_and(|s| s.class_name == class_name);
            let struct_scope = self.cpp_scope(*s, false);
            let is_visible = searched_scopes
                .iter()
                .any(|searched| searched.starts_with(struct_scope.str_cpp()));
            is_name_equal && is_visible
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{CppFunctionDecl, CppParameterList, CppStruct},
        comments::CppElementComments,
        options::SrcmlcppOptions,
    };

    fn push_struct(unit: &mut CppUnit, parent_block: NodeId, name: &str) -> (NodeId, NodeId) {
        let block = unit.push(None, CppElementComments::default(), CppNode::Block(CppBlock::default()));
        let id = unit.push(
            None,
            CppElementComments::default(),
            CppNode::Struct(CppStruct {
                class_name: name.to_string(),
                block,
                ..CppStruct::default()
            }),
        );
        unit.add_element(parent_block, id);
        unit.fill_parents(id);
        (id, block)
    }

    fn push_function(unit: &mut CppUnit, parent_block: NodeId, name: &str) -> NodeId {
        let parameter_list = unit.push(
            None,
            CppElementComments::default(),
            CppNode::ParameterList(CppParameterList::default()),
        );
        let id = unit.push(
            None,
            CppElementComments::default(),
            CppNode::FunctionDecl(CppFunctionDecl {
                function_name: name.to_string(),
                parameter_list,
                ..CppFunctionDecl::default()
            }),
        );
        unit.add_element(parent_block, id);
        unit.fill_parents(id);
        id
    }

    #[test]
    fn test_find_struct_or_class() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let root = unit.root();
        let (outer, outer_block) = push_struct(&mut unit, root, "Outer");
        let ppp = unit.push(
            None,
            CppElementComments::default(),
            CppNode::PublicProtectedPrivate(CppPublicProtectedPrivate {
                access_type: CppAccessType::Public,
                is_default_access: true,
                children: Vec::new(),
            }),
        );
        unit.add_element(outer_block, ppp);
        let (inner, _) = push_struct(&mut unit, ppp, "Inner");

        let global = CppScope::root();
        assert_eq!(unit.find_struct_or_class(root, "Outer", &global), Some(outer));
        assert_eq!(unit.find_struct_or_class(root, "Outer::Inner", &global), Some(inner));
        assert_eq!(
            unit.find_struct_or_class(root, "Inner", &CppScope::from_string("Outer")),
            Some(inner)
        );
        assert_eq!(unit.find_struct_or_class(root, "Inner", &global), None);
        assert_eq!(unit.all_structs_recursive(root), vec![outer, inner]);
    }

    #[test]
    fn test_overloaded_functions() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let root = unit.root();
        let f1 = push_function(&mut unit, root, "f");
        push_function(&mut unit, root, "f");
        let g = push_function(&mut unit, root, "g");

        assert_eq!(unit.all_functions(root).len(), 3);
        assert_eq!(unit.all_functions_with_name(root, "f").len(), 2);
        assert!(unit.is_function_overloaded(root, f1));
        assert!(!unit.is_function_overloaded(root, g));
        assert_eq!(unit.all_functions_recursive(root).len(), 3);
    }
}
