//! The C++ abstract syntax tree.
//!
//! Every element of a parsed file lives in the arena of its [`CppUnit`] and
//! is referred to by a [`NodeId`]. An element owns its children through
//! their ids, and knows its parent through a non-owning id filled once the
//! tree is built. Derived views (qualified, terse or specialized elements)
//! are detached clones appended to the same arena: their root keeps the
//! parent of the element they were derived from.

mod blocks;
mod clone;
mod decl;
mod enums;
mod function;
mod leaves;
mod qualify;
mod render;
mod structs;
mod types;
mod visit;

use std::{collections::HashMap, fmt, rc::Rc};

use log::debug;

pub use blocks::{CppBlock, CppNamespace, CppPublicProtectedPrivate};
pub use decl::{CppDecl, CppDeclContext, CppDeclStatement};
pub use enums::CppEnum;
pub use function::{CppFunctionDecl, CppParameter, CppParameterList, CppTemplate};
pub use leaves::{CppComment, CppConditionMacro, CppDefine, CppUnprocessed};
pub use structs::{CppStruct, CppSuper, CppSuperList};
pub use types::{AUTHORIZED_MODIFIERS, CppType};
pub use visit::VisitEvent;

use crate::{
    comments::CppElementComments,
    error::{Diagnostic, DiagnosticCollector, WarningType},
    options::SrcmlcppOptions,
    scope::{CppScope, CppScopePart, CppScopeType, ScopeIdentifiers, ScopedElementCache},
    wrapper::SrcmlWrapper,
};

/// Index of an element in the arena of a [`CppUnit`]. The default id is the
/// unit root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Access specifier of a struct or class section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CppAccessType {
    Public,
    Protected,
    Private,
}

impl CppAccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CppAccessType::Public => "public",
            CppAccessType::Protected => "protected",
            CppAccessType::Private => "private",
        }
    }

    /// Parse `public`, `protected` or `private`. An empty name gives
    /// `public`, as for the bases of a struct.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "" | "public" => Some(CppAccessType::Public),
            "protected" => Some(CppAccessType::Protected),
            "private" => Some(CppAccessType::Private),
            _ => None,
        }
    }
}

impl fmt::Display for CppAccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kinds of elements, with their data.
#[derive(Debug, Clone)]
pub enum CppNode {
    Unit(CppBlock),
    Block(CppBlock),
    PublicProtectedPrivate(CppPublicProtectedPrivate),
    Type(CppType),
    Decl(CppDecl),
    DeclStatement(CppDeclStatement),
    Parameter(CppParameter),
    ParameterList(CppParameterList),
    Template(CppTemplate),
    FunctionDecl(CppFunctionDecl),
    Function(CppFunctionDecl),
    ConstructorDecl(CppFunctionDecl),
    Constructor(CppFunctionDecl),
    Struct(CppStruct),
    Class(CppStruct),
    Super(CppSuper),
    SuperList(CppSuperList),
    Namespace(CppNamespace),
    Enum(CppEnum),
    Comment(CppComment),
    EmptyLine,
    ConditionMacro(CppConditionMacro),
    Define(CppDefine),
    Unprocessed(CppUnprocessed),
}

impl CppNode {
    /// Name of the element kind, as shown by [`CppUnit::hierarchy_overview`].
    pub fn type_name(&self) -> &'static str {
        match self {
            CppNode::Unit(_) => "CppUnit",
            CppNode::Block(_) => "CppBlock",
            CppNode::PublicProtectedPrivate(_) => "CppPublicProtectedPrivate",
            CppNode::Type(_) => "CppType",
            CppNode::Decl(_) => "CppDecl",
            CppNode::DeclStatement(_) => "CppDeclStatement",
            CppNode::Parameter(_) => "CppParameter",
            CppNode::ParameterList(_) => "CppParameterList",
            CppNode::Template(_) => "CppTemplate",
            CppNode::FunctionDecl(_) => "CppFunctionDecl",
            CppNode::Function(_) => "CppFunction",
            CppNode::ConstructorDecl(_) => "CppConstructorDecl",
            CppNode::Constructor(_) => "CppConstructor",
            CppNode::Struct(_) => "CppStruct",
            CppNode::Class(_) => "CppClass",
            CppNode::Super(_) => "CppSuper",
            CppNode::SuperList(_) => "CppSuperList",
            CppNode::Namespace(_) => "CppNamespace",
            CppNode::Enum(_) => "CppEnum",
            CppNode::Comment(_) => "CppComment",
            CppNode::EmptyLine => "CppEmptyLine",
            CppNode::ConditionMacro(_) => "CppConditionMacro",
            CppNode::Define(_) => "CppDefine",
            CppNode::Unprocessed(_) => "CppUnprocessed",
        }
    }

    /// Functions, function definitions and constructors.
    pub fn as_function(&self) -> Option<&CppFunctionDecl> {
        match self {
            CppNode::FunctionDecl(f)
            | CppNode::Function(f)
            | CppNode::ConstructorDecl(f)
            | CppNode::Constructor(f) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn as_function_mut(&mut self) -> Option<&mut CppFunctionDecl> {
        match self {
            CppNode::FunctionDecl(f)
            | CppNode::Function(f)
            | CppNode::ConstructorDecl(f)
            | CppNode::Constructor(f) => Some(f),
            _ => None,
        }
    }

    /// Structs and classes.
    pub fn as_struct(&self) -> Option<&CppStruct> {
        match self {
            CppNode::Struct(s) | CppNode::Class(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decl(&self) -> Option<&CppDecl> {
        match self {
            CppNode::Decl(d) => Some(d),
            _ => None,
        }
    }

    pub(crate) fn as_decl_mut(&mut self) -> Option<&mut CppDecl> {
        match self {
            CppNode::Decl(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_type(&self) -> Option<&CppType> {
        match self {
            CppNode::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&CppEnum> {
        match self {
            CppNode::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_parameter_list(&self) -> Option<&CppParameterList> {
        match self {
            CppNode::ParameterList(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&CppParameter> {
        match self {
            CppNode::Parameter(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_ppp(&self) -> Option<&CppPublicProtectedPrivate> {
        match self {
            CppNode::PublicProtectedPrivate(p) => Some(p),
            _ => None,
        }
    }

    /// The children of units, blocks and access sections.
    pub fn block_children(&self) -> Option<&[NodeId]> {
        match self {
            CppNode::Unit(b) | CppNode::Block(b) => Some(&b.children),
            CppNode::PublicProtectedPrivate(p) => Some(&p.children),
            _ => None,
        }
    }

    pub(crate) fn block_children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            CppNode::Unit(b) | CppNode::Block(b) => Some(&mut b.children),
            CppNode::PublicProtectedPrivate(p) => Some(&mut p.children),
            _ => None,
        }
    }

    pub fn is_function(&self) -> bool {
        self.as_function().is_some()
    }

    pub fn is_struct(&self) -> bool {
        self.as_struct().is_some()
    }
}

/// One element of the tree: its data, comments, origin and parent.
#[derive(Debug, Clone)]
pub struct CppElement {
    parent: Option<NodeId>,
    origin: Option<SrcmlWrapper>,
    comments: CppElementComments,
    node: CppNode,
}

impl CppElement {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The srcML element this element was parsed from, if any.
    pub fn origin(&self) -> Option<&SrcmlWrapper> {
        self.origin.as_ref()
    }

    pub fn comments(&self) -> &CppElementComments {
        &self.comments
    }

    pub fn node(&self) -> &CppNode {
        &self.node
    }
}

/// A parsed C++ file.
///
/// Owns the arena of all the elements; [`root`](Self::root) is the unit
/// element itself. Most queries take the [`NodeId`] of the element they
/// apply to.
#[derive(Debug, Clone)]
pub struct CppUnit {
    nodes: Vec<CppElement>,
    options: Rc<SrcmlcppOptions>,
    diagnostics: Vec<Diagnostic>,
    identifiers: ScopeIdentifiers,
    qualified_cache: HashMap<NodeId, ScopedElementCache<NodeId>>,
    terse_cache: HashMap<NodeId, ScopedElementCache<NodeId>>,
}

impl CppUnit {
    /// An empty unit.
    pub fn new(options: SrcmlcppOptions, origin: Option<SrcmlWrapper>) -> Self {
        let root = CppElement {
            parent: None,
            origin,
            comments: CppElementComments::default(),
            node: CppNode::Unit(CppBlock::default()),
        };
        Self {
            nodes: vec![root],
            options: Rc::new(options),
            diagnostics: Vec::new(),
            identifiers: ScopeIdentifiers::new(),
            qualified_cache: HashMap::new(),
            terse_cache: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn options(&self) -> &SrcmlcppOptions {
        &self.options
    }

    /// Name of the parsed file, if known.
    pub fn filename(&self) -> Option<&str> {
        self.nodes[0].origin.as_ref().and_then(|o| o.filename())
    }

    /// The warnings emitted while parsing.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Record a warning about `id`, unless the options silence it.
    pub fn emit_warning(&mut self, id: NodeId, warning_type: WarningType, message: &str) {
        let mut message = message.to_string();
        let mut span = None;
        if let Some(origin) = self.origin(id) {
            message = format!("{message}\n{}", origin.context_message());
            span = origin.span();
        }
        let mut diagnostic = Diagnostic::warning(message).with_warning_type(warning_type);
        if let Some(code) = warning_type.code() {
            diagnostic = diagnostic.with_code(code);
        }
        if let Some(span) = span {
            diagnostic = diagnostic.with_label(span, self.node(id).type_name());
        }
        self.push_diagnostic(diagnostic);
    }

    /// Record a diagnostic, unless the options silence it.
    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        let mut collector = DiagnosticCollector::new(&self.options);
        collector.emit(diagnostic);
        collector.drain_into(&mut self.diagnostics);
    }

    /// Number of elements in the arena, derived views included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block_children(self.root()).is_empty()
    }

    pub fn element(&self, id: NodeId) -> &CppElement {
        &self.nodes[id.0]
    }

    pub fn node(&self, id: NodeId) -> &CppNode {
        &self.nodes[id.0].node
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut CppNode {
        &mut self.nodes[id.0].node
    }

    pub fn comments(&self, id: NodeId) -> &CppElementComments {
        &self.nodes[id.0].comments
    }

    pub fn comments_mut(&mut self, id: NodeId) -> &mut CppElementComments {
        &mut self.nodes[id.0].comments
    }

    pub fn origin(&self, id: NodeId) -> Option<&SrcmlWrapper> {
        self.nodes[id.0].origin.as_ref()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.0].parent = parent;
    }

    /// Append a detached element to the arena.
    pub(crate) fn push(
        &mut self,
        origin: Option<SrcmlWrapper>,
        comments: CppElementComments,
        node: CppNode,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(CppElement {
            parent: None,
            origin,
            comments,
            node,
        });
        id
    }

    /// Drop the detached elements appended after the first `len` ones.
    pub(crate) fn truncate_arena(&mut self, len: usize) {
        self.nodes.truncate(len.max(1));
    }

    /// Children of a unit, block or access section (empty for other kinds).
    pub fn block_children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).block_children().unwrap_or(&[])
    }

    /// Append `child` to the block `block` and make it its parent.
    pub fn add_element(&mut self, block: NodeId, child: NodeId) {
        if let Some(children) = self.node_mut(block).block_children_mut() {
            children.push(child);
            self.set_parent(child, Some(block));
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Number of ancestors of `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors_list(id, false).len()
    }

    /// Parent, grand-parent, ... up to the root (`id` first when
    /// `include_self`).
    pub fn ancestors_list(&self, id: NodeId, include_self: bool) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = if include_self { Some(id) } else { self.parent(id) };
        while let Some(ancestor) = current {
            ancestors.push(ancestor);
            current = self.parent(ancestor);
        }
        ancestors
    }

    /// The topmost ancestor of `id`, normally the unit root.
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors_list(id, true).last().copied().unwrap_or(id)
    }

    /// The scope introduced by `id` itself, for namespaces, structs and enums.
    pub fn self_scope(&self, id: NodeId) -> Option<CppScopePart> {
        match self.node(id) {
            CppNode::Struct(s) | CppNode::Class(s) => Some(CppScopePart::new(
                CppScopeType::ClassOrStruct,
                s.class_name.clone(),
            )),
            CppNode::Namespace(ns) => Some(CppScopePart::new(
                CppScopeType::Namespace,
                ns.ns_name.clone(),
            )),
            CppNode::Enum(e) => Some(CppScopePart::new(CppScopeType::Enum, e.enum_name.clone())),
            _ => None,
        }
    }

    /// The scope of `id`.
    ///
    /// ```cpp
    /// namespace Foo {
    ///     struct S {
    ///         void dummy();  // scope: Foo::S
    ///     };
    /// }
    /// ```
    ///
    /// The values of a C enum leak into the scope enclosing the enum.
    pub fn cpp_scope(&self, id: NodeId, include_self: bool) -> CppScope {
        let mut ancestors = self.ancestors_list(id, include_self);
        ancestors.reverse();
        if let Some(parent_enum) = self.parent_enum_if_applicable(id) {
            let is_c_enum = self
                .node(parent_enum)
                .as_enum()
                .is_some_and(|e| !e.is_enum_class());
            if is_c_enum {
                let keep = ancestors.len().saturating_sub(2);
                ancestors.truncate(keep);
            }
        }
        CppScope::new(
            ancestors
                .into_iter()
                .filter_map(|ancestor| self.self_scope(ancestor))
                .collect(),
        )
    }

    /// The name of a declaration, function, struct, namespace or enum.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.node(id) {
            CppNode::Decl(d) => Some(&d.decl_name),
            CppNode::Struct(s) | CppNode::Class(s) => Some(&s.class_name),
            CppNode::Namespace(ns) => Some(&ns.ns_name),
            CppNode::Enum(e) => Some(&e.enum_name),
            CppNode::Define(d) => Some(&d.macro_name),
            node => node.as_function().map(|f| f.function_name.as_str()),
        }
    }

    /// The code of the srcML element `id` was parsed from.
    pub fn str_code_verbatim(&self, id: NodeId) -> String {
        self.origin(id)
            .map(SrcmlWrapper::verbatim_source)
            .unwrap_or_default()
    }

    /// `CppDecl name=a scope=Blah::Foo`: the kind, the name as written in
    /// the srcML element, and the scope.
    pub fn short_cpp_element_info(&self, id: NodeId, include_scope: bool) -> String {
        let mut info = self.node(id).type_name().to_string();
        if let Some(origin) = self.origin(id) {
            if let Some(name) = origin.extract_name_from_xml() {
                info.push_str(&format!(" name={name}"));
            }
        }
        if include_scope {
            let scope = self.cpp_scope(id, false);
            if !scope.is_root() {
                info.push_str(&format!(" scope={scope}"));
            }
        }
        info
    }

    /// One line per visited element, indented by two spaces per depth.
    pub fn hierarchy_overview(&self, id: NodeId) -> String {
        let mut overview = String::new();
        self.visit(id, &mut |unit, element, event, depth| {
            if event == VisitEvent::OnElement {
                overview.push_str(&"  ".repeat(depth));
                overview.push_str(&unit.short_cpp_element_info(element, true));
                overview.push('\n');
            }
        });
        overview
    }

    // =========================================================================
    // Scope identifiers
    // =========================================================================

    /// The qualified identifiers of the unit.
    pub fn scope_identifiers(&self) -> &ScopeIdentifiers {
        &self.identifiers
    }

    /// Rebuild the identifier cache (after the tree was modified).
    pub fn fill_scope_identifiers_cache(&mut self) {
        let mut identifiers = ScopeIdentifiers::new();
        for id in self.all_cpp_elements_recursive(self.root()) {
            let shall_add = match self.node(id) {
                CppNode::Struct(_) | CppNode::Class(_) | CppNode::Enum(_) => true,
                node if node.is_function() => !self.is_constructor(id),
                CppNode::Decl(_) => matches!(
                    self.decl_context(id),
                    CppDeclContext::VarDecl | CppDeclContext::EnumDecl
                ),
                _ => false,
            };
            if shall_add {
                if let Some(name) = self.name(id) {
                    identifiers.insert(self.cpp_scope(id, false).qualified_name(name));
                }
            }
        }
        debug!(count = identifiers.len(); "Filled scope identifiers");
        self.identifiers = identifiers;
    }

    /// Forget the memoized qualified and terse views.
    pub fn clear_scope_caches(&mut self) {
        self.qualified_cache.clear();
        self.terse_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_type_names() {
        assert_eq!(CppAccessType::from_name("protected"), Some(CppAccessType::Protected));
        assert_eq!(CppAccessType::from_name(""), Some(CppAccessType::Public));
        assert_eq!(CppAccessType::from_name("friend"), None);
        assert_eq!(CppAccessType::Private.to_string(), "private");
    }

    #[test]
    fn test_programmatic_tree() {
        let mut unit = CppUnit::new(SrcmlcppOptions::default(), None);
        let block = unit.push(None, CppElementComments::default(), CppNode::Block(CppBlock::default()));
        let ns = unit.push(
            None,
            CppElementComments::default(),
            CppNode::Namespace(CppNamespace {
                ns_name: "N".to_string(),
                block,
            }),
        );
        let root = unit.root();
        unit.add_element(root, ns);
        unit.fill_parents(root);

        assert_eq!(unit.parent(block), Some(ns));
        assert_eq!(unit.depth(block), 2);
        assert_eq!(unit.cpp_scope(block, false).str_cpp(), "N");
        assert_eq!(unit.cpp_scope(ns, false).str_cpp(), "");
        assert_eq!(unit.cpp_scope(ns, true).str_cpp(), "N");
        assert_eq!(unit.root_of(block), root);
        assert_eq!(unit.name(ns), Some("N"));
        assert_eq!(unit.hierarchy_overview(root), "CppUnit\n  CppNamespace\n    CppBlock scope=N\n");
    }
}
