//! The frozen, queryable search index and its environment stamp.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{IndexError, Result};
use crate::interner::{TermId, TermInterner};
use crate::objects::ObjectIndex;
use crate::postings::{DocId, PostingStore};
use crate::tokenize::Tokenizer;

/// Version of the index structure itself. Bumped whenever the serialized
/// layout or normalization semantics change incompatibly.
pub const FORMAT_VERSION: u32 = 1;

/// Version vector identifying the schema set an index was built against:
/// the global format version plus one integer per contributing domain.
///
/// Compatibility is exact equality. A stale stamp is a hard incompatibility
/// the caller resolves by rebuilding, never a soft degrade.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvStamp {
    pub format: u32,
    pub domains: BTreeMap<String, u32>,
}

impl EnvStamp {
    pub fn new(domains: BTreeMap<String, u32>) -> Self {
        Self {
            format: FORMAT_VERSION,
            domains,
        }
    }

    /// Checks this stamp against the domain versions a query engine expects.
    pub fn ensure_compatible(&self, expected: &BTreeMap<String, u32>) -> Result<()> {
        if self.format != FORMAT_VERSION {
            return Err(IndexError::Incompatible {
                reason: format!(
                    "format version {} (engine expects {FORMAT_VERSION})",
                    self.format
                ),
            });
        }
        for (domain, want) in expected {
            match self.domains.get(domain) {
                Some(have) if have == want => {}
                Some(have) => {
                    return Err(IndexError::Incompatible {
                        reason: format!("domain '{domain}': index has {have}, expected {want}"),
                    });
                }
                None => {
                    return Err(IndexError::Incompatible {
                        reason: format!("domain '{domain}': missing from index, expected {want}"),
                    });
                }
            }
        }
        if let Some((domain, have)) = self
            .domains
            .iter()
            .find(|(domain, _)| !expected.contains_key(*domain))
        {
            return Err(IndexError::Incompatible {
                reason: format!("domain '{domain}': index has {have}, engine expects none"),
            });
        }
        Ok(())
    }
}

/// A document's identity as recorded at build time. The docid is its
/// position in the index's document array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Logical path or slug of the source page.
    pub docname: String,
    /// Display title.
    pub title: String,
}

/// A complete, immutable search index.
///
/// Produced by [`crate::builder::IndexBuilder::finish`] or by deserializing
/// a previously built index. There is no mutation API: a rebuild publishes a
/// brand-new instance, so readers holding an `Arc` to this one are never
/// exposed to partial state and queries need no locking.
pub struct SearchIndex {
    docs: Vec<Document>,
    interner: TermInterner,
    postings: PostingStore,
    objects: ObjectIndex,
    stamp: EnvStamp,
    tokenizer: Tokenizer,
    /// Term ids in lexicographic string order, for bounded prefix scans.
    sorted_terms: Vec<TermId>,
}

impl SearchIndex {
    pub(crate) fn new(
        docs: Vec<Document>,
        interner: TermInterner,
        postings: PostingStore,
        objects: ObjectIndex,
        stamp: EnvStamp,
        tokenizer: Tokenizer,
    ) -> Self {
        let sorted_terms = interner.sorted_ids();
        Self {
            docs,
            interner,
            postings,
            objects,
            stamp,
            tokenizer,
            sorted_terms,
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.docs
    }

    pub fn document(&self, doc: DocId) -> Option<&Document> {
        self.docs.get(doc as usize)
    }

    pub fn document_count(&self) -> usize {
        self.docs.len()
    }

    pub fn term_count(&self) -> usize {
        self.interner.len()
    }

    pub fn stamp(&self) -> &EnvStamp {
        &self.stamp
    }

    pub fn interner(&self) -> &TermInterner {
        &self.interner
    }

    pub fn postings(&self) -> &PostingStore {
        &self.postings
    }

    pub fn objects(&self) -> &ObjectIndex {
        &self.objects
    }

    /// The tokenizer this index was built with. Queries must run through the
    /// same instance or recall silently degrades.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Ids of all interned terms starting with `prefix`, in lexicographic
    /// order. The sorted term table makes this two binary searches plus the
    /// matching range, not a scan over the whole vocabulary.
    pub(crate) fn terms_with_prefix(&self, prefix: &str) -> &[TermId] {
        let start = self
            .sorted_terms
            .partition_point(|&id| self.term_str(id) < prefix);
        let len = self.sorted_terms[start..]
            .partition_point(|&id| self.term_str(id).starts_with(prefix));
        &self.sorted_terms[start..start + len]
    }

    fn term_str(&self, id: TermId) -> &str {
        // Ids come from our own sorted table; resolution cannot miss.
        self.interner.resolve(id).unwrap_or("")
    }
}

impl fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchIndex")
            .field("documents", &self.docs.len())
            .field("terms", &self.interner.len())
            .field("objects", &self.objects.len())
            .field("stamp", &self.stamp)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn domains(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn matching_stamp_is_compatible() {
        let stamp = EnvStamp::new(domains(&[("api", 3), ("std", 1)]));
        check!(stamp.ensure_compatible(&domains(&[("api", 3), ("std", 1)])).is_ok());
    }

    #[test]
    fn version_drift_is_hard_failure() {
        let stamp = EnvStamp::new(domains(&[("api", 2)]));
        let err = stamp.ensure_compatible(&domains(&[("api", 3)])).unwrap_err();
        check!(matches!(err, IndexError::Incompatible { .. }));
        check!(err.to_string().contains("index has 2, expected 3"));
    }

    #[test]
    fn missing_and_extra_domains_fail() {
        let stamp = EnvStamp::new(domains(&[("api", 3)]));
        check!(stamp.ensure_compatible(&domains(&[("api", 3), ("std", 1)])).is_err());
        check!(stamp.ensure_compatible(&domains(&[])).is_err());
    }

    #[test]
    fn foreign_format_version_fails() {
        let stamp = EnvStamp {
            format: FORMAT_VERSION + 1,
            domains: BTreeMap::new(),
        };
        let err = stamp.ensure_compatible(&BTreeMap::new()).unwrap_err();
        check!(err.to_string().contains("format version"));
    }
}
