//! Qualified and terse views of types, declarations and functions.
//!
//! ```cpp
//! namespace N1 { namespace N2 {
//!     struct S {};
//!     void f(S s = S());  // qualified: void f(N1::N2::S s = N1::N2::S())
//! } }
//! ```
//!
//! A view is a detached copy of the element appended to the arena, or the
//! element itself when nothing changes. Views are memoized per element and
//! scope until [`CppUnit::clear_scope_caches`] is called.

use crate::{
    ast::{CppNode, CppType, CppUnit, NodeId},
    scope::{CppScope, ScopedElementCache, make_terse_code},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Qualified,
    Terse,
}

fn type_with_typenames(cpp_type: &CppType, joined_typenames: &str) -> CppType {
    CppType {
        typenames: joined_typenames.split(' ').map(str::to_string).collect(),
        ..cpp_type.clone()
    }
}

impl CppUnit {
    /// The element with its types and values fully qualified as seen from
    /// `scope` (by default, the scope of the element).
    ///
    /// Applies to types, declarations, declaration statements, parameter
    /// lists and functions; other elements are returned unchanged. A
    /// `(void)` parameter list becomes empty.
    pub fn with_qualified_types(&mut self, id: NodeId, scope: Option<&CppScope>) -> NodeId {
        self.derived_view(id, scope, View::Qualified)
    }

    /// The element with its types and values scoped only as much as needed
    /// from `scope` (by default, the scope of the element).
    pub fn with_terse_types(&mut self, id: NodeId, scope: Option<&CppScope>) -> NodeId {
        self.derived_view(id, scope, View::Terse)
    }

    fn derived_view(&mut self, id: NodeId, scope: Option<&CppScope>, view: View) -> NodeId {
        let scope = match scope {
            Some(scope) => scope.clone(),
            None => self.cpp_scope(id, false),
        };
        let cache = match view {
            View::Qualified => &self.qualified_cache,
            View::Terse => &self.terse_cache,
        };
        if let Some(cached) = cache.get(&id).and_then(|c| c.get(&scope)) {
            return cached;
        }

        let checkpoint = self.len();
        let copy = self.deep_clone(id);
        let was_changed = match view {
            View::Qualified => self.qualify_in_place(copy, &scope),
            View::Terse => self.make_terse_in_place(copy, &scope),
        };
        let result = if was_changed {
            copy
        } else {
            self.truncate_arena(checkpoint);
            id
        };

        let cache = match view {
            View::Qualified => &mut self.qualified_cache,
            View::Terse => &mut self.terse_cache,
        };
        cache
            .entry(id)
            .or_insert_with(ScopedElementCache::new)
            .store(&scope, result);
        result
    }

    fn qualified_type(&self, cpp_type: &CppType, scope: &CppScope) -> Option<CppType> {
        if cpp_type.typenames.is_empty() {
            return None;
        }
        let typename = cpp_type.typenames.join(" ");
        let qualified = self.identifiers.qualify_cpp_code(&typename, scope);
        (qualified != typename).then(|| type_with_typenames(cpp_type, &qualified))
    }

    // =========================================================================
    // Qualification
    // =========================================================================

    fn qualify_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        match self.node(id) {
            CppNode::Type(_) => self.qualify_type_in_place(id, scope),
            CppNode::Decl(_) => self.qualify_decl_in_place(id, scope),
            CppNode::DeclStatement(stmt) => {
                let decls = stmt.decls.clone();
                decls
                    .into_iter()
                    .fold(false, |changed, d| self.qualify_decl_in_place(d, scope) || changed)
            }
            CppNode::ParameterList(_) => self.qualify_parameter_list_in_place(id, scope),
            node if node.is_function() => {
                let mut changed = false;
                if let Some(return_type) = self.function(id).and_then(|f| f.return_type) {
                    changed |= self.qualify_type_in_place(return_type, scope);
                }
                if let Some(parameter_list) = self.function(id).map(|f| f.parameter_list) {
                    changed |= self.qualify_parameter_list_in_place(parameter_list, scope);
                }
                changed
            }
            _ => false,
        }
    }

    fn qualify_type_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        let Some(new_type) = self
            .node(id)
            .as_type()
            .and_then(|t| self.qualified_type(t, scope))
        else {
            return false;
        };
        *self.node_mut(id) = CppNode::Type(new_type);
        true
    }

    fn qualify_decl_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        let Some(decl) = self.decl(id) else {
            return false;
        };
        let cpp_type = decl.cpp_type;
        let initial_value = decl.initial_value_code.clone();

        let mut changed = false;
        if let Some(cpp_type) = cpp_type {
            changed |= self.qualify_type_in_place(cpp_type, scope);
        }
        if !initial_value.is_empty() {
            let qualified = self.identifiers.qualify_cpp_code(&initial_value, scope);
            if qualified != initial_value {
                if let Some(decl) = self.node_mut(id).as_decl_mut() {
                    decl.initial_value_code = qualified;
                }
                changed = true;
            }
        }
        changed
    }

    fn qualify_parameter_list_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        let parameters = self.parameters(id).to_vec();
        if let [single] = parameters.as_slice() {
            if self.parameter_type(*single).is_some_and(CppType::is_void) {
                if let CppNode::ParameterList(list) = self.node_mut(id) {
                    list.parameters.clear();
                }
                return true;
            }
        }
        let mut changed = false;
        for parameter in parameters {
            if let Some(decl) = self.parameter_decl(parameter) {
                changed |= self.qualify_decl_in_place(decl, scope);
            }
        }
        changed
    }

    // =========================================================================
    // Terse views
    // =========================================================================

    fn make_terse_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        match self.node(id) {
            CppNode::Type(_) => self.make_terse_type_in_place(id, scope),
            CppNode::Decl(_) => self.make_terse_decl_in_place(id, scope),
            CppNode::DeclStatement(stmt) => {
                let decls = stmt.decls.clone();
                decls
                    .into_iter()
                    .fold(false, |changed, d| self.make_terse_decl_in_place(d, scope) || changed)
            }
            CppNode::ParameterList(_) => self.make_terse_parameter_list_in_place(id, scope),
            node if node.is_function() => {
                let scope = self.method_terse_scope(id, scope);
                let mut changed = false;
                if let Some(return_type) = self.function(id).and_then(|f| f.return_type) {
                    changed |= self.make_terse_type_in_place(return_type, &scope);
                }
                if let Some(parameter_list) = self.function(id).map(|f| f.parameter_list) {
                    changed |= self.make_terse_parameter_list_in_place(parameter_list, &scope);
                }
                changed
            }
            _ => false,
        }
    }

    /// Inside a struct declaration, the types of a method are written
    /// relative to the scope enclosing the struct.
    fn method_terse_scope(&self, id: NodeId, scope: &CppScope) -> CppScope {
        let last_part = scope.parts().last().map(|p| p.scope_name.as_str());
        let is_struct_scope = self
            .parent_struct_name_if_method(id)
            .is_some_and(|name| Some(name) == last_part);
        if is_struct_scope {
            scope.parent_scope().unwrap_or_default()
        } else {
            scope.clone()
        }
    }

    /// The type is first qualified from its own scope, then shortened.
    fn make_terse_type_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        let Some(cpp_type) = self.node(id).as_type() else {
            return false;
        };
        let own_scope = self.cpp_scope(id, false);
        let qualified = self
            .qualified_type(cpp_type, &own_scope)
            .unwrap_or_else(|| cpp_type.clone());
        let terse = make_terse_code(&qualified.typenames.join(" "), &scope.str_cpp_prefix());
        if terse == cpp_type.typenames.join(" ") {
            return false;
        }
        let new_type = type_with_typenames(cpp_type, &terse);
        *self.node_mut(id) = CppNode::Type(new_type);
        true
    }

    fn make_terse_decl_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        let Some(decl) = self.decl(id) else {
            return false;
        };
        let cpp_type = decl.cpp_type;
        let initial_value = decl.initial_value_code.clone();

        let mut changed = false;
        if let Some(cpp_type) = cpp_type {
            changed |= self.make_terse_type_in_place(cpp_type, scope);
        }
        let terse = make_terse_code(&initial_value, &scope.str_cpp_prefix());
        if terse != initial_value {
            if let Some(decl) = self.node_mut(id).as_decl_mut() {
                decl.initial_value_code = terse;
            }
            changed = true;
        }
        changed
    }

    fn make_terse_parameter_list_in_place(&mut self, id: NodeId, scope: &CppScope) -> bool {
        let mut changed = false;
        for parameter in self.parameters(id).to_vec() {
            if let Some(decl) = self.parameter_decl(parameter) {
                changed |= self.make_terse_decl_in_place(decl, scope);
            }
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{CppBlock, CppDecl, CppDeclStatement, CppNamespace, CppStruct},
        comments::CppElementComments,
        options::SrcmlcppOptions,
    };

    fn push(unit: &mut CppUnit, node: CppNode) -> NodeId {
        unit.push(None, CppElementComments::default(), node)
    }

    /// `namespace N { struct S {}; S s = S(); }`
    fn unit_with_namespace() -> (CppUnit, NodeId, NodeId) {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let struct_block = push(&mut unit, CppNode::Block(CppBlock::default()));
        let s = push(
            &mut unit,
            CppNode::Struct(CppStruct {
                class_name: "S".to_string(),
                block: struct_block,
                ..CppStruct::default()
            }),
        );
        let cpp_type = push(&mut unit, CppNode::Type(CppType::from_typenames(&["S"])));
        let decl = push(
            &mut unit,
            CppNode::Decl(CppDecl {
                cpp_type: Some(cpp_type),
                decl_name: "s".to_string(),
                initial_value_code: "S()".to_string(),
                ..CppDecl::default()
            }),
        );
        let stmt = push(&mut unit, CppNode::DeclStatement(CppDeclStatement { decls: vec![decl] }));
        let ns_block = push(&mut unit, CppNode::Block(CppBlock { children: vec![s, stmt] }));
        let ns = push(
            &mut unit,
            CppNode::Namespace(CppNamespace {
                ns_name: "N".to_string(),
                block: ns_block,
            }),
        );
        let root = unit.root();
        unit.add_element(root, ns);
        unit.fill_parents(root);
        unit.fill_scope_identifiers_cache();
        (unit, decl, cpp_type)
    }

    #[test]
    fn test_qualified_decl() {
        let (mut unit, decl, _) = unit_with_namespace();
        let qualified = unit.with_qualified_types(decl, None);
        assert_ne!(qualified, decl);
        assert_eq!(unit.str_code(qualified), "N::S s = N::S()");
        assert_eq!(unit.str_code(decl), "S s = S()");
        assert_eq!(unit.with_qualified_types(decl, None), qualified);

        let terse = unit.with_terse_types(qualified, None);
        assert_eq!(unit.str_code(terse), "S s = S()");
    }

    #[test]
    fn test_unchanged_view_is_the_element() {
        let (mut unit, _, cpp_type) = unit_with_namespace();
        let len = unit.len();
        let from_root = unit.with_qualified_types(cpp_type, Some(&CppScope::root()));
        assert_eq!(from_root, cpp_type);
        assert_eq!(unit.len(), len);
    }
}
