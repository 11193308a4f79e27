//! Per-scope memoization of derived elements.

use std::collections::HashMap;

use crate::scope::CppScope;

/// Values computed for a given scope, keyed by the scope spelling.
#[derive(Debug, Clone)]
pub struct ScopedElementCache<V> {
    entries: HashMap<String, V>,
}

impl<V> Default for ScopedElementCache<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V: Clone> ScopedElementCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, scope: &CppScope) -> bool {
        self.entries.contains_key(scope.str_cpp())
    }

    pub fn get(&self, scope: &CppScope) -> Option<V> {
        self.entries.get(scope.str_cpp()).cloned()
    }

    pub fn store(&mut self, scope: &CppScope, value: V) {
        self.entries.insert(scope.str_cpp().to_string(), value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_keyed_by_scope_spelling() {
        let mut cache = ScopedElementCache::new();
        cache.store(&CppScope::from_string("A::B"), 3);
        assert!(cache.contains(&CppScope::from_string("A::B")));
        assert_eq!(cache.get(&CppScope::from_string("A::B")), Some(3));
        assert_eq!(cache.get(&CppScope::from_string("A")), None);

        cache.clear();
        assert!(cache.is_empty());
    }
}
