//! In-memory search index engine for static documentation.
//!
//! A build pass turns `(docname, title, text)` triples into a frozen
//! [`SearchIndex`]: interned terms, title/body posting sets, and an object
//! index for named API symbols, stamped with the schema versions it was
//! built against. A [`Searcher`] resolves free-text queries against a shared
//! index with exact-then-prefix term matching, AND-combination across
//! tokens, and deterministic weighted ranking — all bounded, synchronous,
//! in-memory work.

pub mod builder;
pub mod error;
pub mod format;
pub mod index;
pub mod interner;
pub mod objects;
pub mod postings;
pub mod query;
pub mod scoring;
pub mod tokenize;
pub mod tracing;

pub use builder::{DocumentInput, IndexBuilder};
pub use error::{IndexError, Result};
pub use format::{from_json, read_snapshot, to_json, write_snapshot};
pub use index::{Document, EnvStamp, FORMAT_VERSION, SearchIndex};
pub use objects::ObjectEntry;
pub use query::{MatchKind, SearchHit, Searcher};
pub use tokenize::{Stem, StemAlgorithm, Tokenizer, TokenizerConfig};
