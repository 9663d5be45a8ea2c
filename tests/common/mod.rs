//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use docsearch::{DocumentInput, IndexBuilder, SearchIndex, Searcher, TokenizerConfig};

/// Domain versions the fixture index is built against.
pub fn fixture_domains() -> BTreeMap<String, u32> {
    [("api".to_string(), 3), ("std".to_string(), 1)]
        .into_iter()
        .collect()
}

/// A small documentation corpus exercising title/body overlap, shared
/// vocabulary, and object-bearing pages.
pub fn corpus() -> Vec<DocumentInput> {
    vec![
        DocumentInput::new("intro", "Intro", "the quick brown fox"),
        DocumentInput::new("fox-facts", "Fox Facts", "a fox is quick"),
        DocumentInput::new(
            "api/parser",
            "Parser API",
            "parse documents with the parser module",
        ),
        DocumentInput::new("guide", "User Guide", "getting started guide for new users"),
    ]
}

/// Builds the fixture index: the corpus plus two object entries on the
/// parser page.
pub fn fixture_index() -> Arc<SearchIndex> {
    docsearch::tracing::init();
    let mut builder = IndexBuilder::new(TokenizerConfig::default(), fixture_domains());
    for doc in corpus() {
        builder.add_document(doc).unwrap();
    }
    builder
        .add_object("pkg.parser.parse", 2, "pkg.parser.parse", "function", 1)
        .unwrap();
    builder
        .add_object("pkg.parser.Parser", 2, "pkg.parser.Parser", "class", 1)
        .unwrap();
    Arc::new(builder.finish())
}

/// A searcher over the fixture index with matching expected versions.
pub fn fixture_searcher() -> Searcher {
    Searcher::new(fixture_index(), fixture_domains())
}
