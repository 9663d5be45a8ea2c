//! Query resolution and ranking against a frozen [`SearchIndex`].

use ahash::{AHashMap, AHashSet};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::Result;
use crate::index::SearchIndex;
use crate::postings::{DocId, PostingList};
use crate::scoring::{
    OBJECT_EXACT_WEIGHT, OBJECT_SUFFIX_WEIGHT, TITLE_PHRASE_BONUS, term_weight,
};

/// How a result was matched: through the term index, or through a named
/// object entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchKind {
    Text,
    Object { label: String, kind: String },
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub doc: DocId,
    pub docname: String,
    pub title: String,
    pub score: u32,
    pub kind: MatchKind,
}

/// Read-only query handle over a shared index.
///
/// Holds the domain versions this engine was built against; every search
/// verifies the index stamp before touching postings, so an engine can never
/// return results computed from an incompatible index. Cloning is cheap and
/// searchers may run concurrently from any number of threads.
#[derive(Clone)]
pub struct Searcher {
    index: Arc<SearchIndex>,
    expected: BTreeMap<String, u32>,
}

impl Searcher {
    pub fn new(index: Arc<SearchIndex>, expected: BTreeMap<String, u32>) -> Self {
        Self { index, expected }
    }

    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Resolves a raw query string to a ranked result list.
    ///
    /// Query text runs through the index's own tokenizer, so normalization is
    /// identical to build time. Multi-token queries AND across tokens: a
    /// document must contribute for every token or it is excluded outright.
    /// Tokens with no exact term fall back to a bounded prefix scan at lower
    /// weight. Object matches merge in above text matches. An empty query is
    /// an empty result, not an error.
    pub fn search(&self, raw: &str) -> Result<Vec<SearchHit>> {
        self.index.stamp().ensure_compatible(&self.expected)?;

        let tokens = self.index.tokenizer().tokenize(raw);
        let mut hits = self.object_hits(raw);
        if let Some(candidates) = self.text_candidates(&tokens)? {
            let needle = raw.trim().to_lowercase();
            for (doc, mut score) in candidates {
                let Some(document) = self.index.document(doc) else {
                    continue;
                };
                if title_contains_phrase(&document.title, &needle) {
                    score += TITLE_PHRASE_BONUS;
                }
                hits.push(SearchHit {
                    doc,
                    docname: document.docname.clone(),
                    title: document.title.clone(),
                    score,
                    kind: MatchKind::Text,
                });
            }
        }

        sort_hits(&mut hits);
        tracing::debug!(query = raw, tokens = tokens.len(), hits = hits.len(), "search resolved");
        Ok(hits)
    }

    /// Per-document summed scores for documents matching every token, or
    /// `None` when some token matches nothing at all (which empties the AND).
    fn text_candidates(&self, tokens: &[String]) -> Result<Option<AHashMap<DocId, u32>>> {
        let mut combined: Option<AHashMap<DocId, u32>> = None;
        for token in tokens {
            let weights = self.token_weights(token)?;
            if weights.is_empty() {
                return Ok(None);
            }
            combined = Some(match combined {
                None => weights,
                Some(acc) => acc
                    .into_iter()
                    .filter_map(|(doc, score)| {
                        weights.get(&doc).map(|w| (doc, score + w))
                    })
                    .collect(),
            });
            if combined.as_ref().is_some_and(|acc| acc.is_empty()) {
                return Ok(None);
            }
        }
        Ok(combined)
    }

    /// Best per-document weight for one query token: exact postings when the
    /// term is interned, otherwise the union of all prefix-matching terms at
    /// partial weight. Multiple prefix expansions contribute their max, not
    /// their sum.
    fn token_weights(&self, token: &str) -> Result<AHashMap<DocId, u32>> {
        let mut weights = AHashMap::new();
        if let Some(term) = self.index.interner().get(token) {
            accumulate(&mut weights, self.index.postings().postings(term), true);
        }
        if weights.is_empty() {
            let expansions = self.index.terms_with_prefix(token);
            for &term in expansions {
                accumulate(&mut weights, self.index.postings().postings(term), false);
            }
            if !expansions.is_empty() {
                let first = self.index.interner().resolve(expansions[0])?;
                tracing::debug!(
                    token,
                    expansions = expansions.len(),
                    first,
                    "prefix fallback"
                );
            }
        }
        Ok(weights)
    }

    /// Object-index hits for the raw query: the whole trimmed query plus each
    /// whitespace word, un-stemmed since qualified names are not prose.
    fn object_hits(&self, raw: &str) -> Vec<SearchHit> {
        let mut needles: Vec<&str> = raw.split_whitespace().collect();
        let trimmed = raw.trim();
        if needles.len() > 1 {
            needles.push(trimmed);
        }

        let mut seen: AHashSet<(DocId, String)> = AHashSet::new();
        let mut hits = Vec::new();
        for needle in needles {
            for hit in self.index.objects().lookup(needle) {
                let entry = hit.entry;
                if !seen.insert((entry.doc, entry.label.clone())) {
                    continue;
                }
                let Some(document) = self.index.document(entry.doc) else {
                    continue;
                };
                let base = if hit.exact {
                    OBJECT_EXACT_WEIGHT
                } else {
                    OBJECT_SUFFIX_WEIGHT
                };
                hits.push(SearchHit {
                    doc: entry.doc,
                    docname: document.docname.clone(),
                    title: document.title.clone(),
                    score: base.saturating_sub(entry.priority),
                    kind: MatchKind::Object {
                        label: entry.label.clone(),
                        kind: entry.kind.clone(),
                    },
                });
            }
        }
        hits
    }
}

/// Whether the raw query occurs verbatim in the title at word boundaries.
///
/// An in-word substring does not count ("par" inside "Parser"), otherwise
/// every prefix-fallback hit on a title term would collect the phrase bonus
/// too.
fn title_contains_phrase(title: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let title = title.to_lowercase();
    let mut start = 0;
    while let Some(pos) = title[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let left_clear = title[..begin]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric());
        let right_clear = title[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_alphanumeric());
        if left_clear && right_clear {
            return true;
        }
        start = end;
    }
    false
}

/// Folds one posting list into a per-document weight map, keeping the best
/// weight seen for each document.
fn accumulate(weights: &mut AHashMap<DocId, u32>, postings: &PostingList, exact: bool) {
    for &doc in postings.title_docs().iter().chain(postings.body_docs()) {
        if let Some(weight) = term_weight(postings, doc, exact) {
            let slot = weights.entry(doc).or_insert(0);
            *slot = (*slot).max(weight);
        }
    }
}

/// Deterministic result order: score descending, docid ascending, object
/// hits before text hits at equal score, label as the final tie-break.
fn sort_hits(hits: &mut [SearchHit]) {
    hits.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.doc.cmp(&b.doc))
            .then_with(|| kind_rank(&a.kind).cmp(&kind_rank(&b.kind)))
            .then_with(|| kind_label(&a.kind).cmp(kind_label(&b.kind)))
    });
}

fn kind_rank(kind: &MatchKind) -> u8 {
    match kind {
        MatchKind::Object { .. } => 0,
        MatchKind::Text => 1,
    }
}

fn kind_label(kind: &MatchKind) -> &str {
    match kind {
        MatchKind::Object { label, .. } => label,
        MatchKind::Text => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    fn hit(doc: DocId, score: u32, kind: MatchKind) -> SearchHit {
        SearchHit {
            doc,
            docname: format!("doc{doc}"),
            title: String::new(),
            score,
            kind,
        }
    }

    #[test]
    fn phrase_match_requires_word_boundaries() {
        check!(title_contains_phrase("Parser API", "parser"));
        check!(title_contains_phrase("Fox Facts", "fox facts"));
        check!(title_contains_phrase("The Parser", "parser"));
        // in-word substrings do not count
        check!(!title_contains_phrase("Parser API", "par"));
        check!(!title_contains_phrase("Unfoxed", "fox"));
        check!(!title_contains_phrase("Anything", ""));
    }

    #[test]
    fn sort_is_score_then_docid_then_kind() {
        let object = MatchKind::Object {
            label: "x".to_string(),
            kind: "function".to_string(),
        };
        let mut hits = vec![
            hit(3, 5, MatchKind::Text),
            hit(1, 5, MatchKind::Text),
            hit(1, 5, object.clone()),
            hit(0, 20, MatchKind::Text),
        ];
        sort_hits(&mut hits);
        check!(hits[0].doc == 0);
        check!(hits[1].doc == 1 && hits[1].kind == object);
        check!(hits[2].doc == 1 && hits[2].kind == MatchKind::Text);
        check!(hits[3].doc == 3);
    }
}
