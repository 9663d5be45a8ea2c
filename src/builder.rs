//! Whole-index construction from extracted document text.
//!
//! The mutable build state and the immutable query state are separate types:
//! [`IndexBuilder`] grows the tables, and [`IndexBuilder::finish`] consumes
//! it into a [`SearchIndex`] that exposes no mutation at all. Freezing is a
//! type change, not a runtime flag.

use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

use crate::error::{IndexError, Result};
use crate::index::{Document, EnvStamp, SearchIndex};
use crate::interner::TermInterner;
use crate::objects::{ObjectEntry, ObjectIndex};
use crate::postings::{DocId, MatchClass, PostingStore};
use crate::tokenize::{Tokenizer, TokenizerConfig};

/// One `(docname, title, text)` triple from the extraction pipeline.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub docname: String,
    pub title: String,
    pub text: String,
}

impl DocumentInput {
    pub fn new(
        docname: impl Into<String>,
        title: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            docname: docname.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Accumulates documents and objects, then freezes into a [`SearchIndex`].
///
/// At most one builder mutates a given index-in-progress, and nothing can
/// query it before `finish`; readers only ever see complete indices.
pub struct IndexBuilder {
    docs: Vec<Document>,
    interner: TermInterner,
    postings: PostingStore,
    objects: ObjectIndex,
    tokenizer: Tokenizer,
    domains: BTreeMap<String, u32>,
}

impl IndexBuilder {
    pub fn new(config: TokenizerConfig, domains: BTreeMap<String, u32>) -> Self {
        Self::with_tokenizer(Tokenizer::new(config), domains)
    }

    /// Builder over a caller-constructed tokenizer, for custom stem hooks.
    pub fn with_tokenizer(tokenizer: Tokenizer, domains: BTreeMap<String, u32>) -> Self {
        Self {
            docs: Vec::new(),
            interner: TermInterner::default(),
            postings: PostingStore::default(),
            objects: ObjectIndex::default(),
            tokenizer,
            domains,
        }
    }

    /// Registers a document and indexes its title and body. Docids are
    /// assigned densely in call order.
    pub fn add_document(&mut self, input: DocumentInput) -> Result<DocId> {
        if input.docname.trim().is_empty() {
            return Err(IndexError::EmptyDocname {
                index: self.docs.len(),
            });
        }
        let doc = self.docs.len() as DocId;
        self.index_field(&input.title, doc, MatchClass::Title);
        self.index_field(&input.text, doc, MatchClass::Body);
        self.docs.push(Document {
            docname: input.docname,
            title: input.title,
        });
        Ok(doc)
    }

    fn index_field(&mut self, text: &str, doc: DocId, class: MatchClass) {
        for token in self.tokenizer.tokenize(text) {
            let term = self.interner.intern(&token);
            self.postings.add(term, doc, class);
        }
    }

    /// Registers a named object against an already-added document.
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        doc: DocId,
        label: impl Into<String>,
        kind: impl Into<String>,
        priority: u32,
    ) -> Result<()> {
        let name = name.into();
        if doc as usize >= self.docs.len() {
            return Err(IndexError::UnknownDocument { name, doc });
        }
        self.objects.add(ObjectEntry {
            name,
            doc,
            label: label.into(),
            kind: kind.into(),
            priority,
        });
        Ok(())
    }

    /// Freezes the builder into an immutable, queryable index.
    pub fn finish(mut self) -> SearchIndex {
        self.objects.freeze();
        let stamp = EnvStamp::new(self.domains);
        tracing::info!(
            documents = self.docs.len(),
            terms = self.interner.len(),
            objects = self.objects.len(),
            "froze search index"
        );
        SearchIndex::new(
            self.docs,
            self.interner,
            self.postings,
            self.objects,
            stamp,
            self.tokenizer,
        )
    }

    /// All-or-nothing convenience build: any malformed triple aborts the
    /// whole run and no index is produced.
    pub fn build(
        config: TokenizerConfig,
        domains: BTreeMap<String, u32>,
        docs: impl IntoIterator<Item = DocumentInput>,
    ) -> Result<SearchIndex> {
        Self::build_with_cancel(config, domains, docs, &CancellationToken::new())
    }

    /// Like [`Self::build`], but checks `cancel` between documents and
    /// abandons the in-progress build when it fires. A previously published
    /// index is unaffected either way.
    pub fn build_with_cancel(
        config: TokenizerConfig,
        domains: BTreeMap<String, u32>,
        docs: impl IntoIterator<Item = DocumentInput>,
        cancel: &CancellationToken,
    ) -> Result<SearchIndex> {
        let start = std::time::Instant::now();
        let mut builder = Self::new(config, domains);
        for input in docs {
            if cancel.is_cancelled() {
                return Err(IndexError::BuildCancelled);
            }
            builder.add_document(input)?;
        }
        let index = builder.finish();
        tracing::debug!("index build completed in {:?}", start.elapsed());
        Ok(index)
    }
}
