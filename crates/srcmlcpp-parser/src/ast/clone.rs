//! Deep copies of subtrees.

use crate::ast::{CppElement, CppNode, CppUnit, NodeId};

/// Apply `f` to every child slot of `node`, replacing the ids it holds.
fn map_child_slots(node: &mut CppNode, f: &mut impl FnMut(NodeId) -> NodeId) {
    fn map_all(ids: &mut [NodeId], f: &mut impl FnMut(NodeId) -> NodeId) {
        for id in ids.iter_mut() {
            *id = f(*id);
        }
    }
    fn map_opt(id: &mut Option<NodeId>, f: &mut impl FnMut(NodeId) -> NodeId) {
        if let Some(id) = id.as_mut() {
            *id = f(*id);
        }
    }

    match node {
        CppNode::Unit(b) | CppNode::Block(b) => map_all(&mut b.children, f),
        CppNode::PublicProtectedPrivate(p) => map_all(&mut p.children, f),
        CppNode::Decl(d) => map_opt(&mut d.cpp_type, f),
        CppNode::DeclStatement(s) => map_all(&mut s.decls, f),
        CppNode::Parameter(p) => map_opt(&mut p.decl, f),
        CppNode::ParameterList(l) => map_all(&mut l.parameters, f),
        CppNode::Template(t) => t.parameter_list = f(t.parameter_list),
        CppNode::FunctionDecl(func)
        | CppNode::Function(func)
        | CppNode::ConstructorDecl(func)
        | CppNode::Constructor(func) => {
            map_opt(&mut func.return_type, f);
            func.parameter_list = f(func.parameter_list);
            map_opt(&mut func.template, f);
            map_opt(&mut func.body, f);
            map_opt(&mut func.member_init_list, f);
        }
        CppNode::Struct(s) | CppNode::Class(s) => {
            map_opt(&mut s.super_list, f);
            s.block = f(s.block);
            map_opt(&mut s.template, f);
        }
        CppNode::SuperList(l) => map_all(&mut l.supers, f),
        CppNode::Namespace(ns) => ns.block = f(ns.block),
        CppNode::Enum(e) => e.block = f(e.block),
        CppNode::Type(_)
        | CppNode::Super(_)
        | CppNode::Comment(_)
        | CppNode::EmptyLine
        | CppNode::ConditionMacro(_)
        | CppNode::Define(_)
        | CppNode::Unprocessed(_) => {}
    }
}

impl CppUnit {
    /// Copy the subtree of `id` into new elements.
    ///
    /// The copy is detached: no block lists it, but its root has the same
    /// parent as `id`, so that its scope is the scope of the original.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let parent = self.parent(id);
        let copy = self.clone_subtree(id);
        self.set_parent(copy, parent);
        self.fill_parents(copy);
        copy
    }

    fn clone_subtree(&mut self, id: NodeId) -> NodeId {
        let mut element = self.element(id).clone();
        map_child_slots(&mut element.node, &mut |child| self.clone_subtree(child));
        self.push_element(element)
    }

    /// Copy the subtree of `id` from another unit into this one.
    ///
    /// The copy is detached and has no parent.
    pub fn import_subtree(&mut self, other: &CppUnit, id: NodeId) -> NodeId {
        let copy = self.import_from(other, id);
        self.set_parent(copy, None);
        self.fill_parents(copy);
        copy
    }

    fn import_from(&mut self, other: &CppUnit, id: NodeId) -> NodeId {
        let mut element = other.element(id).clone();
        map_child_slots(&mut element.node, &mut |child| self.import_from(other, child));
        self.push_element(element)
    }

    fn push_element(&mut self, element: CppElement) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(element);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{CppDecl, CppDeclStatement, CppType},
        comments::CppElementComments,
        options::SrcmlcppOptions,
    };

    #[test]
    fn test_deep_clone_is_independent() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let ty = unit.push(
            None,
            CppElementComments::default(),
            CppNode::Type(CppType::from_typenames(&["int"])),
        );
        let decl = unit.push(
            None,
            CppElementComments::default(),
            CppNode::Decl(CppDecl {
                cpp_type: Some(ty),
                decl_name: "a".to_string(),
                ..CppDecl::default()
            }),
        );
        let stmt = unit.push(
            None,
            CppElementComments::default(),
            CppNode::DeclStatement(CppDeclStatement { decls: vec![decl] }),
        );
        let root = unit.root();
        unit.add_element(root, stmt);
        unit.fill_parents(root);

        let copy = unit.deep_clone(decl);
        assert_ne!(copy, decl);
        assert_eq!(unit.parent(copy), Some(stmt));
        let copied_type = unit.decl(copy).and_then(|d| d.cpp_type);
        assert!(copied_type.is_some_and(|t| t != ty));
        assert_eq!(copied_type.and_then(|t| unit.parent(t)), Some(copy));

        if let Some(d) = unit.node_mut(copy).as_decl_mut() {
            d.decl_name = "b".to_string();
        }
        assert_eq!(unit.decl(decl).map(|d| d.decl_name.as_str()), Some("a"));
        assert_eq!(unit.decl_statement_decls(stmt), &[decl]);

        let mut other = CppUnit::new(SrcmlcppOptions::default(), None);
        let imported = other.import_subtree(&unit, stmt);
        assert_eq!(other.parent(imported), None);
        assert_eq!(other.all_cpp_elements_recursive(imported).len(), 3);
    }
}
