//! Object index: named symbols (API entries) resolved beside the term index.

use serde::{Deserialize, Serialize};

use crate::postings::DocId;

/// One named object, e.g. an API symbol extracted by the documentation
/// pipeline. Qualified names are dotted paths; the same name may appear in
/// several documents and resolves as multiple results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    /// Fully qualified, dotted name ("pkg.module.Symbol").
    pub name: String,
    /// Document the object is described in.
    pub doc: DocId,
    /// Anchor or display label within that document.
    pub label: String,
    /// Object-type tag ("function", "class", ...).
    pub kind: String,
    /// Ranking priority; lower ranks higher. Default is 1.
    pub priority: u32,
}

/// A lookup hit, distinguishing exact name matches from suffix matches so
/// the query engine can weight them differently.
#[derive(Debug, Clone, Copy)]
pub struct ObjectHit<'a> {
    pub entry: &'a ObjectEntry,
    pub exact: bool,
}

/// Append-only collection of object entries, sorted by qualified name when
/// the build freezes.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ObjectIndex {
    entries: Vec<ObjectEntry>,
}

impl ObjectIndex {
    pub(crate) fn add(&mut self, entry: ObjectEntry) {
        self.entries.push(entry);
    }

    /// Sorts entries by name so lookup order falls out of iteration order.
    pub(crate) fn freeze(&mut self) {
        self.entries
            .sort_by(|a, b| a.name.cmp(&b.name).then(a.doc.cmp(&b.doc)));
    }

    pub fn entries(&self) -> &[ObjectEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves `query` against qualified names, case-insensitively.
    ///
    /// Exact matches come first, then entries whose name ends with
    /// `.{query}` (so the last path segment alone finds its owners). Both
    /// groups keep lexicographic name order as a stable tie-break. An empty
    /// result is a valid "nothing matched", not an error.
    pub fn lookup(&self, query: &str) -> Vec<ObjectHit<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let suffix = format!(".{needle}");

        let mut exact = Vec::new();
        let mut partial = Vec::new();
        for entry in &self.entries {
            let name = entry.name.to_lowercase();
            if name == needle {
                exact.push(ObjectHit { entry, exact: true });
            } else if name.ends_with(&suffix) {
                partial.push(ObjectHit {
                    entry,
                    exact: false,
                });
            }
        }
        exact.extend(partial);
        exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    fn fixture() -> ObjectIndex {
        let mut index = ObjectIndex::default();
        for (name, doc, kind) in [
            ("pkg.parse", 0, "function"),
            ("pkg.io.parse", 1, "function"),
            ("pkg.io.Parser", 1, "class"),
            ("parse", 2, "function"),
        ] {
            index.add(ObjectEntry {
                name: name.to_string(),
                doc,
                label: name.to_string(),
                kind: kind.to_string(),
                priority: 1,
            });
        }
        index.freeze();
        index
    }

    #[test]
    fn exact_before_suffix_then_lexicographic() {
        let index = fixture();
        let hits = index.lookup("parse");
        let names: Vec<&str> = hits.iter().map(|h| h.entry.name.as_str()).collect();
        check!(names == ["parse", "pkg.io.parse", "pkg.parse"]);
        check!(hits[0].exact);
        check!(!hits[1].exact);
    }

    #[test]
    fn qualified_exact_match() {
        let index = fixture();
        let hits = index.lookup("pkg.io.parse");
        check!(hits.len() == 1);
        check!(hits[0].exact);
        check!(hits[0].entry.doc == 1);
    }

    #[rstest]
    #[case("nothing")]
    #[case("")]
    #[case("  ")]
    fn misses_yield_empty(#[case] query: &str) {
        check!(fixture().lookup(query).is_empty());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let index = fixture();
        let hits = index.lookup("PARSER");
        check!(hits.len() == 1);
        check!(hits[0].entry.name == "pkg.io.Parser");
    }
}
