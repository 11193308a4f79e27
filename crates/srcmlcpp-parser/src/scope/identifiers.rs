//! The qualified identifiers declared in a unit.

use indexmap::IndexSet;
use log::trace;

use crate::scope::{CppScope, process::qualify_code};

/// Fully qualified names of the structs, enums, functions and variables of
/// a unit, e.g. `N1::N2::S` or `N1::N3::a`.
#[derive(Debug, Clone, Default)]
pub struct ScopeIdentifiers {
    qualified: IndexSet<String>,
}

impl ScopeIdentifiers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, qualified_name: impl Into<String>) {
        self.qualified.insert(qualified_name.into());
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.qualified.contains(qualified_name)
    }

    pub fn len(&self) -> usize {
        self.qualified.len()
    }

    pub fn is_empty(&self) -> bool {
        self.qualified.is_empty()
    }

    pub fn clear(&mut self) {
        self.qualified.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.qualified.iter().map(String::as_str)
    }

    /// Qualify the identifiers of `cpp_code` (a type or a value) as seen
    /// from `scope`.
    ///
    /// An identifier is replaced only when it names a known identifier from
    /// one of the scopes enclosing `scope`, the innermost scope winning.
    /// Identifiers starting with `::` and unknown identifiers are kept.
    pub fn qualify_cpp_code(&self, cpp_code: &str, scope: &CppScope) -> String {
        let prefixes = scope.hierarchy_prefixes();
        let qualified = qualify_code(cpp_code, &prefixes, |candidate| self.contains(candidate));
        if qualified != cpp_code {
            trace!(scope = scope.str_cpp(), code = cpp_code, qualified = qualified.as_str(); "Qualified code");
        }
        qualified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identifiers() -> ScopeIdentifiers {
        let mut ids = ScopeIdentifiers::new();
        for name in [
            "f",
            "N1::N2::S2",
            "N1::N2::S2::s2",
            "N1::N2::E2",
            "N1::N2::E2::a",
            "N1::N2::f2",
            "N1::N3::E3",
            "N1::N3::a",
            "N1::N3::f3",
            "N1::N3::g",
        ] {
            ids.insert(name);
        }
        ids
    }

    #[test]
    fn test_qualify_from_inner_scope() {
        let ids = identifiers();
        let scope = CppScope::from_string("N1::N3");
        let cases = [
            ("int", "int"),
            ("f()", "f()"),
            ("N2::S2", "N1::N2::S2"),
            ("N2::S2()", "N1::N2::S2()"),
            ("N2::E2::a", "N1::N2::E2::a"),
            ("E3", "N1::N3::E3"),
            ("N3::a", "N1::N3::a"),
            ("N1::N3::f3()", "N1::N3::f3()"),
            ("N1::N4::f4()", "N1::N4::f4()"),
            ("N2::S2::s2", "N1::N2::S2::s2"),
            ("::E3", "::E3"),
        ];
        for (code, expected) in cases {
            assert_eq!(ids.qualify_cpp_code(code, &scope), expected, "code: {code}");
        }
    }

    #[test]
    fn test_inaccessible_names_are_kept() {
        let ids = identifiers();
        assert_eq!(ids.qualify_cpp_code("E3", &CppScope::from_string("N1::N2")), "E3");
        assert_eq!(ids.qualify_cpp_code("S2", &CppScope::root()), "S2");
    }
}
