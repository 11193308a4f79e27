//! Tree traversal.

use crate::ast::{CppNode, CppUnit, NodeId};

/// Events sent to the visitor callback for every element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitEvent {
    OnElement,
    OnBeforeChildren,
    OnAfterChildren,
}

impl CppUnit {
    /// The children shown by [`visit`](Self::visit), in order.
    ///
    /// Function definitions only expose their body: their signature parts
    /// are reached through [`child_slots`](Self::child_slots).
    pub fn visit_children(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            CppNode::Unit(b) | CppNode::Block(b) => b.children.clone(),
            CppNode::PublicProtectedPrivate(p) => p.children.clone(),
            CppNode::Decl(d) => d.cpp_type.into_iter().collect(),
            CppNode::DeclStatement(s) => s.decls.clone(),
            CppNode::Parameter(p) => p.decl.into_iter().collect(),
            CppNode::ParameterList(l) => l.parameters.clone(),
            CppNode::Template(t) => vec![t.parameter_list],
            CppNode::FunctionDecl(f) | CppNode::ConstructorDecl(f) => f
                .return_type
                .into_iter()
                .chain(Some(f.parameter_list))
                .chain(f.template)
                .collect(),
            CppNode::Function(f) => f.body.into_iter().collect(),
            CppNode::Constructor(f) => f.body.into_iter().chain(f.member_init_list).collect(),
            CppNode::Struct(s) | CppNode::Class(s) => s
                .super_list
                .into_iter()
                .chain(Some(s.block))
                .chain(s.template)
                .collect(),
            CppNode::SuperList(l) => l.supers.clone(),
            CppNode::Namespace(ns) => vec![ns.block],
            CppNode::Enum(e) => vec![e.block],
            CppNode::Type(_)
            | CppNode::Super(_)
            | CppNode::Comment(_)
            | CppNode::EmptyLine
            | CppNode::ConditionMacro(_)
            | CppNode::Define(_)
            | CppNode::Unprocessed(_) => Vec::new(),
        }
    }

    /// Every element directly owned by `id`.
    pub fn child_slots(&self, id: NodeId) -> Vec<NodeId> {
        match self.node(id) {
            CppNode::Function(f) | CppNode::Constructor(f) => f
                .return_type
                .into_iter()
                .chain(Some(f.parameter_list))
                .chain(f.template)
                .chain(f.body)
                .chain(f.member_init_list)
                .collect(),
            _ => self.visit_children(id),
        }
    }

    /// Call `visitor` on `id` and its descendants, depth first.
    ///
    /// Each element sends `OnElement` then, around its children,
    /// `OnBeforeChildren` and `OnAfterChildren`. `depth` starts at 0 for `id`.
    pub fn visit<F>(&self, id: NodeId, visitor: &mut F)
    where
        F: FnMut(&CppUnit, NodeId, VisitEvent, usize),
    {
        self.visit_at(id, 0, visitor);
    }

    fn visit_at<F>(&self, id: NodeId, depth: usize, visitor: &mut F)
    where
        F: FnMut(&CppUnit, NodeId, VisitEvent, usize),
    {
        visitor(self, id, VisitEvent::OnElement, depth);
        let children = self.visit_children(id);
        if children.is_empty() && self.is_leaf(id) {
            return;
        }
        visitor(self, id, VisitEvent::OnBeforeChildren, depth);
        for child in children {
            self.visit_at(child, depth + 1, visitor);
        }
        visitor(self, id, VisitEvent::OnAfterChildren, depth);
    }

    fn is_leaf(&self, id: NodeId) -> bool {
        matches!(
            self.node(id),
            CppNode::Type(_)
                | CppNode::Super(_)
                | CppNode::Comment(_)
                | CppNode::EmptyLine
                | CppNode::ConditionMacro(_)
                | CppNode::Define(_)
                | CppNode::Unprocessed(_)
        )
    }

    /// `id` and all its visited descendants, in visit order.
    pub fn all_cpp_elements_recursive(&self, id: NodeId) -> Vec<NodeId> {
        let mut elements = Vec::new();
        self.visit(id, &mut |_, element, event, _| {
            if event == VisitEvent::OnElement {
                elements.push(element);
            }
        });
        elements
    }

    /// Set the parent of every element owned (directly or not) by `id`.
    pub fn fill_parents(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for child in self.child_slots(current) {
                self.set_parent(child, Some(current));
                stack.push(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{CppBlock, CppDecl, CppDeclStatement, CppType},
        comments::CppElementComments,
        options::SrcmlcppOptions,
    };

    fn unit_with_decl_stmt() -> (CppUnit, NodeId) {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let no_comments = CppElementComments::default;
        let ty = unit.push(None, no_comments(), CppNode::Type(CppType::from_typenames(&["int"])));
        let decl = unit.push(
            None,
            no_comments(),
            CppNode::Decl(CppDecl {
                cpp_type: Some(ty),
                decl_name: "a".to_string(),
                ..CppDecl::default()
            }),
        );
        let stmt = unit.push(
            None,
            no_comments(),
            CppNode::DeclStatement(CppDeclStatement { decls: vec![decl] }),
        );
        let root = unit.root();
        unit.add_element(root, stmt);
        unit.fill_parents(root);
        (unit, stmt)
    }

    #[test]
    fn test_visit_events() {
        let (unit, _) = unit_with_decl_stmt();
        let mut events = Vec::new();
        unit.visit(unit.root(), &mut |unit, id, event, depth| {
            events.push((unit.node(id).type_name(), event, depth));
        });
        assert_eq!(
            events,
            vec![
                ("CppUnit", VisitEvent::OnElement, 0),
                ("CppUnit", VisitEvent::OnBeforeChildren, 0),
                ("CppDeclStatement", VisitEvent::OnElement, 1),
                ("CppDeclStatement", VisitEvent::OnBeforeChildren, 1),
                ("CppDecl", VisitEvent::OnElement, 2),
                ("CppDecl", VisitEvent::OnBeforeChildren, 2),
                ("CppType", VisitEvent::OnElement, 3),
                ("CppDecl", VisitEvent::OnAfterChildren, 2),
                ("CppDeclStatement", VisitEvent::OnAfterChildren, 1),
                ("CppUnit", VisitEvent::OnAfterChildren, 0),
            ]
        );
    }

    #[test]
    fn test_parents_are_filled() {
        let (unit, stmt) = unit_with_decl_stmt();
        let all = unit.all_cpp_elements_recursive(unit.root());
        assert_eq!(all.len(), 4);
        for id in &all[1..] {
            assert!(unit.parent(*id).is_some());
        }
        assert_eq!(unit.parent(stmt), Some(unit.root()));
        let empty = CppBlock::default();
        assert!(empty.children.is_empty());
    }
}
