//! Term interning: a stable, bijective mapping between normalized term
//! strings and dense integer ids.

use ahash::AHashMap;

use crate::error::{IndexError, Result};

/// Dense id of an interned term, zero-based in interning order.
pub type TermId = u32;

/// Monotonically growing string↔id table. Mutation is only reachable through
/// [`crate::builder::IndexBuilder`]; once the builder finishes, the interner
/// is owned by the frozen index and read-only by construction.
#[derive(Debug, Default, Clone)]
pub struct TermInterner {
    ids: AHashMap<String, TermId>,
    strings: Vec<String>,
}

impl TermInterner {
    /// Interns a normalized token, returning its id. Idempotent: repeated
    /// calls with the same string return the same id.
    pub(crate) fn intern(&mut self, token: &str) -> TermId {
        if let Some(&id) = self.ids.get(token) {
            return id;
        }
        let id = self.strings.len() as TermId;
        self.strings.push(token.to_string());
        self.ids.insert(token.to_string(), id);
        id
    }

    /// Looks up an already-interned term without growing the table.
    pub fn get(&self, token: &str) -> Option<TermId> {
        self.ids.get(token).copied()
    }

    /// The inverse of interning. Fails only for ids minted by a different
    /// interner instance, which is an internal invariant violation.
    pub fn resolve(&self, id: TermId) -> Result<&str> {
        self.strings
            .get(id as usize)
            .map(String::as_str)
            .ok_or(IndexError::UnknownTerm(id))
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Every interned `(string, id)` pair in id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, TermId)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (s.as_str(), i as TermId))
    }

    /// All term ids ordered lexicographically by their string. Backs the
    /// prefix-fallback scan in the query engine.
    pub(crate) fn sorted_ids(&self) -> Vec<TermId> {
        let mut ids: Vec<TermId> = (0..self.strings.len() as TermId).collect();
        ids.sort_by_key(|&id| &self.strings[id as usize]);
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn intern_is_idempotent() {
        let mut interner = TermInterner::default();
        let fox = interner.intern("fox");
        let quick = interner.intern("quick");
        check!(fox != quick);
        check!(interner.intern("fox") == fox);
        check!(interner.len() == 2);
    }

    #[test]
    fn resolve_is_inverse() {
        let mut interner = TermInterner::default();
        let id = interner.intern("brown");
        check!(interner.resolve(id).unwrap() == "brown");
        check!(interner.get("brown") == Some(id));
    }

    #[test]
    fn resolve_unknown_id_fails() {
        let interner = TermInterner::default();
        let err = interner.resolve(7).unwrap_err();
        check!(matches!(err, IndexError::UnknownTerm(7)));
    }

    #[test]
    fn sorted_ids_follow_string_order() {
        let mut interner = TermInterner::default();
        let zebra = interner.intern("zebra");
        let apple = interner.intern("apple");
        let mango = interner.intern("mango");
        check!(interner.sorted_ids() == vec![apple, mango, zebra]);
    }
}
