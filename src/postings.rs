//! Posting storage: per-term ordered document sets, split by match class.

use crate::interner::TermId;

/// Dense, zero-based position of a document in the built document array.
pub type DocId = u32;

/// Where a term occurrence came from. Title hits are much stronger relevance
/// evidence than body hits and score accordingly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchClass {
    Title,
    Body,
}

/// The ordered document sets for one term, one per match class.
///
/// Both sets are sorted ascending and de-duplicated: a document appears at
/// most once per class no matter how often the term occurs in it. A document
/// may appear in both classes when the title repeats a body word; scoring
/// takes the higher class only, never the sum.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PostingList {
    title: Vec<DocId>,
    body: Vec<DocId>,
}

/// Shared empty list returned for terms the index never saw.
static EMPTY_POSTINGS: PostingList = PostingList {
    title: Vec::new(),
    body: Vec::new(),
};

impl PostingList {
    pub(crate) fn new(title: Vec<DocId>, body: Vec<DocId>) -> Self {
        Self { title, body }
    }

    pub fn title_docs(&self) -> &[DocId] {
        &self.title
    }

    pub fn body_docs(&self) -> &[DocId] {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.body.is_empty()
    }

    fn set_mut(&mut self, class: MatchClass) -> &mut Vec<DocId> {
        match class {
            MatchClass::Title => &mut self.title,
            MatchClass::Body => &mut self.body,
        }
    }
}

/// Posting lists for every interned term, indexed by [`TermId`].
///
/// Grows in lockstep with the interner during a build; frozen afterwards.
#[derive(Debug, Default, Clone)]
pub struct PostingStore {
    lists: Vec<PostingList>,
}

impl PostingStore {
    /// Registers a `(term, doc)` posting. Idempotent per document and class:
    /// repeated occurrences of a term in one document insert once.
    pub(crate) fn add(&mut self, term: TermId, doc: DocId, class: MatchClass) {
        let slot = term as usize;
        if slot >= self.lists.len() {
            self.lists.resize(slot + 1, PostingList::default());
        }
        let set = self.lists[slot].set_mut(class);
        // Build order is ascending by docid, so the common case is a tail
        // append or a duplicate of the tail.
        match set.last() {
            Some(&last) if last == doc => {}
            Some(&last) if last < doc => set.push(doc),
            None => set.push(doc),
            _ => {
                if let Err(pos) = set.binary_search(&doc) {
                    set.insert(pos, doc);
                }
            }
        }
    }

    /// The posting list for `term`. Unknown terms yield empty sets; absence
    /// is a valid "no matches" result, never an error.
    pub fn postings(&self, term: TermId) -> &PostingList {
        self.lists.get(term as usize).unwrap_or(&EMPTY_POSTINGS)
    }

    pub(crate) fn into_lists(self) -> Vec<PostingList> {
        self.lists
    }

    pub(crate) fn from_lists(lists: Vec<PostingList>) -> Self {
        Self { lists }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn add_is_idempotent_per_doc_and_class() {
        let mut store = PostingStore::default();
        store.add(0, 4, MatchClass::Body);
        store.add(0, 4, MatchClass::Body);
        store.add(0, 4, MatchClass::Title);
        check!(store.postings(0).body_docs() == [4]);
        check!(store.postings(0).title_docs() == [4]);
    }

    #[test]
    fn sets_stay_sorted() {
        let mut store = PostingStore::default();
        for doc in [1, 9, 3, 9, 0] {
            store.add(2, doc, MatchClass::Body);
        }
        check!(store.postings(2).body_docs() == [0, 1, 3, 9]);
    }

    #[test]
    fn unknown_term_yields_empty_sets() {
        let store = PostingStore::default();
        let postings = store.postings(99);
        check!(postings.is_empty());
        check!(postings.title_docs().is_empty());
        check!(postings.body_docs().is_empty());
    }
}
