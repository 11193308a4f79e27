//! C++ scopes and scoped identifiers.
//!
//! A [`CppScope`] is the ordered list of the namespaces, structs and enums
//! enclosing an element, e.g. `N1::N2::S`. The submodules qualify and
//! shorten identifiers found in type and value code with respect to a scope.

mod cache;
mod identifiers;
mod process;

use std::{
    fmt,
    hash::{Hash, Hasher},
};

pub use cache::ScopedElementCache;
pub use identifiers::ScopeIdentifiers;
pub use process::{make_terse_code, make_terse_scoped_identifier, qualify_code};

/// Kind of element introducing a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CppScopeType {
    Namespace,
    ClassOrStruct,
    Enum,
    /// Scope built from a string, without knowledge of its kind.
    Unknown,
}

/// One level of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CppScopePart {
    pub scope_type: CppScopeType,
    pub scope_name: String,
}

impl CppScopePart {
    pub fn new(scope_type: CppScopeType, scope_name: impl Into<String>) -> Self {
        Self {
            scope_type,
            scope_name: scope_name.into(),
        }
    }
}

/// An ordered list of scope parts, from the outermost to the innermost.
///
/// Two scopes are equal when they have the same C++ spelling, whatever the
/// kind of their parts.
#[derive(Debug, Clone, Default)]
pub struct CppScope {
    parts: Vec<CppScopePart>,
    str_cpp: String,
}

impl CppScope {
    pub fn new(parts: Vec<CppScopePart>) -> Self {
        let str_cpp = parts
            .iter()
            .map(|p| p.scope_name.as_str())
            .collect::<Vec<_>>()
            .join("::");
        Self { parts, str_cpp }
    }

    /// The global scope.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `"A::B::C"`. The parts have the [`CppScopeType::Unknown`] kind.
    pub fn from_string(s: &str) -> Self {
        if s.is_empty() {
            return Self::root();
        }
        Self::new(
            s.split("::")
                .map(|name| CppScopePart::new(CppScopeType::Unknown, name))
                .collect(),
        )
    }

    pub fn parts(&self) -> &[CppScopePart] {
        &self.parts
    }

    pub fn is_root(&self) -> bool {
        self.parts.is_empty()
    }

    /// The scope as C++ code, e.g. `A::B` (empty for the global scope).
    pub fn str_cpp(&self) -> &str {
        &self.str_cpp
    }

    /// `A::B::`, or an empty string for the global scope.
    pub fn str_cpp_prefix(&self) -> String {
        if self.str_cpp.is_empty() {
            String::new()
        } else {
            format!("{}::", self.str_cpp)
        }
    }

    pub fn parent_scope(&self) -> Option<CppScope> {
        if self.parts.is_empty() {
            None
        } else {
            Some(Self::new(self.parts[..self.parts.len() - 1].to_vec()))
        }
    }

    /// This scope and its ancestors: `A::B` gives `[A::B, A, <root>]`.
    pub fn hierarchy(&self) -> Vec<CppScope> {
        let mut scopes = Vec::with_capacity(self.parts.len() + 1);
        let mut current = Some(self.clone());
        while let Some(scope) = current {
            current = scope.parent_scope();
            scopes.push(scope);
        }
        scopes
    }

    /// Prefixes of [`hierarchy`](Self::hierarchy): `["A::B::", "A::", ""]`.
    pub fn hierarchy_prefixes(&self) -> Vec<String> {
        self.hierarchy().iter().map(CppScope::str_cpp_prefix).collect()
    }

    /// Whether `other` is this scope or one of its ancestors.
    pub fn can_access_scope(&self, other: &CppScope) -> bool {
        self.hierarchy().iter().any(|scope| scope == other)
    }

    pub fn make_child_scope(&self, part: CppScopePart) -> CppScope {
        let mut parts = self.parts.clone();
        parts.push(part);
        Self::new(parts)
    }

    /// `name` qualified by this scope.
    pub fn qualified_name(&self, name: &str) -> String {
        format!("{}{name}", self.str_cpp_prefix())
    }
}

impl PartialEq for CppScope {
    fn eq(&self, other: &Self) -> bool {
        self.str_cpp == other.str_cpp
    }
}

impl Eq for CppScope {}

impl Hash for CppScope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.str_cpp.hash(state);
    }
}

impl fmt::Display for CppScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.str_cpp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_strings() {
        let scope = CppScope::new(vec![
            CppScopePart::new(CppScopeType::Namespace, "A"),
            CppScopePart::new(CppScopeType::ClassOrStruct, "B"),
        ]);
        assert_eq!(scope.str_cpp(), "A::B");
        assert_eq!(scope.str_cpp_prefix(), "A::B::");
        assert_eq!(scope.qualified_name("f"), "A::B::f");
        assert_eq!(CppScope::root().qualified_name("f"), "f");
        assert_eq!(scope.to_string(), "A::B");
    }

    #[test]
    fn test_hierarchy() {
        let scope = CppScope::from_string("A::B::C");
        assert_eq!(scope.hierarchy_prefixes(), vec!["A::B::C::", "A::B::", "A::", ""]);
        assert_eq!(scope.parent_scope(), Some(CppScope::from_string("A::B")));
        assert_eq!(CppScope::root().parent_scope(), None);
    }

    #[test]
    fn test_equality_ignores_scope_type() {
        let typed = CppScope::new(vec![CppScopePart::new(CppScopeType::Namespace, "N")]);
        assert_eq!(typed, CppScope::from_string("N"));
        assert!(CppScope::from_string("").is_root());
    }

    #[test]
    fn test_can_access_scope() {
        let scope = CppScope::from_string("A::B");
        assert!(scope.can_access_scope(&CppScope::from_string("A")));
        assert!(scope.can_access_scope(&CppScope::root()));
        assert!(scope.can_access_scope(&scope));
        assert!(!scope.can_access_scope(&CppScope::from_string("A::C")));

        let child = scope.make_child_scope(CppScopePart::new(CppScopeType::Enum, "E"));
        assert_eq!(child.str_cpp(), "A::B::E");
        assert!(child.can_access_scope(&scope));
    }
}
