//! Relevance weights and per-term scoring.
//!
//! A document's score for a query is the sum over query tokens of that
//! token's best single contribution, plus flat bonuses. Weights are tunable
//! constants with two hard orderings baked in: title beats body, and exact
//! term resolution beats prefix fallback.

use crate::postings::{DocId, PostingList};

/// Weight of an exact term occurring in a document title.
pub const TITLE_WEIGHT: u32 = 15;
/// Weight of an exact term occurring in a document body.
pub const BODY_WEIGHT: u32 = 5;
/// Title weight when the term was reached through prefix fallback.
pub const PARTIAL_TITLE_WEIGHT: u32 = 7;
/// Body weight when the term was reached through prefix fallback.
pub const PARTIAL_BODY_WEIGHT: u32 = 2;
/// Flat bonus when the raw query appears verbatim in the title, at word
/// boundaries; in-word substrings do not qualify.
pub const TITLE_PHRASE_BONUS: u32 = 10;
/// Score of an object entry whose qualified name matches the query exactly.
pub const OBJECT_EXACT_WEIGHT: u32 = 20;
/// Score of an object entry matched on its final path segment.
pub const OBJECT_SUFFIX_WEIGHT: u32 = 16;

/// Best contribution of one term for one document.
///
/// A document listed in both classes counts the title weight only; summing
/// the classes would let a title that repeats body words inflate itself.
pub fn term_weight(postings: &PostingList, doc: DocId, exact: bool) -> Option<u32> {
    if postings.title_docs().binary_search(&doc).is_ok() {
        Some(if exact { TITLE_WEIGHT } else { PARTIAL_TITLE_WEIGHT })
    } else if postings.body_docs().binary_search(&doc).is_ok() {
        Some(if exact { BODY_WEIGHT } else { PARTIAL_BODY_WEIGHT })
    } else {
        None
    }
}
