//! Layered settings resolution
//!
//! Material settings are resolved through an ordered chain of scopes: global
//! (the base profile), machine, then hotend. A key present in a more specific
//! scope overrides the same key in any scope beneath it.

use indexmap::IndexMap;

/// An ordered chain of borrowed setting scopes, least specific first
///
/// Push scopes from global outward; [`resolve`](ScopeChain::resolve) walks
/// most-specific-first. Used by the serializer to suppress settings that are
/// pure inherited duplicates, and by the deserializer to compose the
/// effective settings of synthesized machine and hotend profiles.
#[derive(Debug, Default)]
pub struct ScopeChain<'a> {
    scopes: Vec<&'a IndexMap<String, String>>,
}

impl<'a> ScopeChain<'a> {
    /// Create an empty chain
    pub fn new() -> Self {
        ScopeChain { scopes: Vec::new() }
    }

    /// Append a scope more specific than all scopes pushed so far
    pub fn push(&mut self, scope: &'a IndexMap<String, String>) {
        self.scopes.push(scope);
    }

    /// Resolve a setting key, most specific scope first
    pub fn resolve(&self, key: &str) -> Option<&'a str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(key).map(String::as_str))
    }

    /// Compose one effective map by applying every scope in override order
    ///
    /// Keys keep the insertion position of the scope that first introduced
    /// them; later scopes override values in place.
    pub fn flattened(&self) -> IndexMap<String, String> {
        let mut effective = IndexMap::new();
        for scope in &self.scopes {
            for (key, value) in scope.iter() {
                effective.insert(key.clone(), value.clone());
            }
        }
        effective
    }
}
