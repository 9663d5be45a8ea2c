mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use assert2::check;
use common::{corpus, fixture_domains, fixture_index, fixture_searcher};
use docsearch::{
    IndexBuilder, IndexError, Searcher, TokenizerConfig, from_json, read_snapshot, to_json,
    write_snapshot,
};

const QUERIES: &[&str] = &[
    "fox",
    "quick fox",
    "par",
    "parse",
    "pkg.parser.parse",
    "guide",
    "nonexistentword",
];

/// Serialize, deserialize, and compare search results query by query.
#[test]
fn json_round_trip_preserves_results() {
    let original = fixture_searcher();
    let json = to_json(original.index()).unwrap();
    let reloaded = Searcher::new(Arc::new(from_json(&json).unwrap()), fixture_domains());

    for &query in QUERIES {
        check!(
            original.search(query).unwrap() == reloaded.search(query).unwrap(),
            "query '{query}' diverged after round trip"
        );
    }
}

#[test]
fn snapshot_round_trip_preserves_results() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs.index");

    let original = fixture_searcher();
    write_snapshot(original.index(), &path).unwrap();
    let reloaded = Searcher::new(Arc::new(read_snapshot(&path).unwrap()), fixture_domains());

    check!(reloaded.index().document_count() == original.index().document_count());
    check!(reloaded.index().term_count() == original.index().term_count());
    for &query in QUERIES {
        check!(original.search(query).unwrap() == reloaded.search(query).unwrap());
    }
}

/// The environment stamp survives serialization, so a reloaded stale index
/// still refuses to answer.
#[test]
fn reloaded_index_keeps_its_stamp() {
    let domains: BTreeMap<String, u32> = [("api".to_string(), 2)].into_iter().collect();
    let index = IndexBuilder::build(TokenizerConfig::default(), domains.clone(), corpus()).unwrap();
    let reloaded = from_json(&to_json(&index).unwrap()).unwrap();
    check!(reloaded.stamp().domains == domains);

    let expected: BTreeMap<String, u32> = [("api".to_string(), 3)].into_iter().collect();
    let err = Searcher::new(Arc::new(reloaded), expected)
        .search("fox")
        .unwrap_err();
    check!(matches!(err, IndexError::Incompatible { .. }));
}

#[test]
fn truncated_snapshot_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("docs.index");

    write_snapshot(&fixture_index(), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    check!(read_snapshot(&path).is_err());
}
