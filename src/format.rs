//! Serialized index formats: a JSON interchange document and a compact
//! binary snapshot.
//!
//! The interchange format keeps the historical shape of documentation search
//! dumps: separate `terms` (body) and `titleterms` (title) maps whose values
//! are a bare docid when a term appears in exactly one document and a docid
//! array otherwise. That duck-typed encoding is normalized into the canonical
//! posting store immediately on load; nothing downstream branches on it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{IndexError, Result};
use crate::index::{Document, EnvStamp, FORMAT_VERSION, SearchIndex};
use crate::interner::TermInterner;
use crate::objects::{ObjectEntry, ObjectIndex};
use crate::postings::{DocId, MatchClass, PostingStore};
use crate::tokenize::{Tokenizer, TokenizerConfig};

/// Wire form of one term's document set.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum DocRefs {
    Single(DocId),
    Multiple(Vec<DocId>),
}

impl DocRefs {
    fn from_docs(docs: &[DocId]) -> Option<Self> {
        match docs {
            [] => None,
            [one] => Some(Self::Single(*one)),
            many => Some(Self::Multiple(many.to_vec())),
        }
    }

    fn into_vec(self) -> Vec<DocId> {
        match self {
            Self::Single(doc) => vec![doc],
            Self::Multiple(docs) => docs,
        }
    }
}

/// The JSON interchange document.
#[derive(Debug, Serialize, Deserialize)]
pub struct SerializedIndex {
    docversion: u32,
    envversion: BTreeMap<String, u32>,
    docs: Vec<Document>,
    terms: BTreeMap<String, DocRefs>,
    titleterms: BTreeMap<String, DocRefs>,
    objects: Vec<ObjectEntry>,
    tokenizer: TokenizerConfig,
}

impl SerializedIndex {
    fn from_index(index: &SearchIndex) -> Self {
        let mut terms = BTreeMap::new();
        let mut titleterms = BTreeMap::new();
        for (term, id) in index.interner().iter() {
            let postings = index.postings().postings(id);
            if let Some(refs) = DocRefs::from_docs(postings.body_docs()) {
                terms.insert(term.to_string(), refs);
            }
            if let Some(refs) = DocRefs::from_docs(postings.title_docs()) {
                titleterms.insert(term.to_string(), refs);
            }
        }
        Self {
            docversion: index.stamp().format,
            envversion: index.stamp().domains.clone(),
            docs: index.documents().to_vec(),
            terms,
            titleterms,
            objects: index.objects().entries().to_vec(),
            tokenizer: index.tokenizer().config().clone(),
        }
    }

    fn into_index(self) -> Result<SearchIndex> {
        if self.docversion != FORMAT_VERSION {
            return Err(IndexError::Incompatible {
                reason: format!(
                    "format version {} (engine expects {FORMAT_VERSION})",
                    self.docversion
                ),
            });
        }
        let doc_count = self.docs.len() as u32;
        let mut interner = TermInterner::default();
        let mut postings = PostingStore::default();
        let mut insert = |term: &str, refs: DocRefs, class: MatchClass| -> Result<()> {
            let id = interner.intern(term);
            for doc in refs.into_vec() {
                if doc >= doc_count {
                    return Err(IndexError::Incompatible {
                        reason: format!("term '{term}' references unknown document {doc}"),
                    });
                }
                postings.add(id, doc, class);
            }
            Ok(())
        };
        for (term, refs) in self.terms {
            insert(&term, refs, MatchClass::Body)?;
        }
        for (term, refs) in self.titleterms {
            insert(&term, refs, MatchClass::Title)?;
        }

        let mut objects = ObjectIndex::default();
        for entry in self.objects {
            if entry.doc >= doc_count {
                return Err(IndexError::Incompatible {
                    reason: format!(
                        "object '{}' references unknown document {}",
                        entry.name, entry.doc
                    ),
                });
            }
            objects.add(entry);
        }
        objects.freeze();

        let stamp = EnvStamp {
            format: self.docversion,
            domains: self.envversion,
        };
        Ok(SearchIndex::new(
            self.docs,
            interner,
            postings,
            objects,
            stamp,
            Tokenizer::new(self.tokenizer),
        ))
    }
}

/// Serializes a built index to the JSON interchange document.
pub fn to_json(index: &SearchIndex) -> Result<String> {
    Ok(serde_json::to_string(&SerializedIndex::from_index(index))?)
}

/// Deserializes an interchange document into a queryable index, normalizing
/// the wire shape into canonical in-memory structures.
pub fn from_json(json: &str) -> Result<SearchIndex> {
    let serialized: SerializedIndex = serde_json::from_str(json)?;
    serialized.into_index()
}

/// Binary snapshot body. Postcard is not self-describing, so this uses the
/// canonical tagged layout rather than the interchange document's untagged
/// docid encoding.
#[derive(Serialize, Deserialize)]
struct Snapshot {
    docversion: u32,
    envversion: BTreeMap<String, u32>,
    docs: Vec<Document>,
    /// `(term, title docs, body docs)` per interned term, in id order.
    terms: Vec<(String, Vec<DocId>, Vec<DocId>)>,
    objects: Vec<ObjectEntry>,
    tokenizer: TokenizerConfig,
}

/// Writes a compact binary snapshot of the index.
pub fn write_snapshot(index: &SearchIndex, path: &Path) -> Result<()> {
    let terms = index
        .interner()
        .iter()
        .map(|(term, id)| {
            let postings = index.postings().postings(id);
            (
                term.to_string(),
                postings.title_docs().to_vec(),
                postings.body_docs().to_vec(),
            )
        })
        .collect();
    let snapshot = Snapshot {
        docversion: index.stamp().format,
        envversion: index.stamp().domains.clone(),
        docs: index.documents().to_vec(),
        terms,
        objects: index.objects().entries().to_vec(),
        tokenizer: index.tokenizer().config().clone(),
    };
    let bytes = postcard::to_stdvec(&snapshot)?;
    std::fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), "wrote index snapshot");
    Ok(())
}

/// Reads a binary snapshot back into a queryable index.
pub fn read_snapshot(path: &Path) -> Result<SearchIndex> {
    let bytes = std::fs::read(path)?;
    let snapshot: Snapshot = postcard::from_bytes(&bytes)?;
    if snapshot.docversion != FORMAT_VERSION {
        return Err(IndexError::Incompatible {
            reason: format!(
                "snapshot format version {} (engine expects {FORMAT_VERSION})",
                snapshot.docversion
            ),
        });
    }

    let mut interner = TermInterner::default();
    let mut postings = PostingStore::default();
    for (term, title, body) in snapshot.terms {
        let id = interner.intern(&term);
        for doc in title {
            postings.add(id, doc, MatchClass::Title);
        }
        for doc in body {
            postings.add(id, doc, MatchClass::Body);
        }
    }
    let mut objects = ObjectIndex::default();
    for entry in snapshot.objects {
        objects.add(entry);
    }
    objects.freeze();

    let stamp = EnvStamp {
        format: snapshot.docversion,
        domains: snapshot.envversion,
    };
    Ok(SearchIndex::new(
        snapshot.docs,
        interner,
        postings,
        objects,
        stamp,
        Tokenizer::new(snapshot.tokenizer),
    ))
}
