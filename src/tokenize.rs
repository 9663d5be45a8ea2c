//! Text tokenization and stemming for search indexing.
//!
//! The same [`Tokenizer`] instance normalizes text at build time and at query
//! time. Recall depends on both sides producing identical terms, so the frozen
//! index owns its tokenizer and the query engine borrows it from there.

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Common English stop words filtered out before interning.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Default minimum token length. Single characters are almost never useful
/// query terms in prose documentation.
const DEFAULT_MIN_TOKEN_LENGTH: usize = 2;

/// Normalizes a lowercased token to its index term. The default is the
/// identity function; [`StemAlgorithm::English`] plugs in Snowball stemming.
pub trait Stem: Send + Sync {
    fn stem(&self, token: &str) -> String;
}

/// Pass-through stemmer: the term is the lowercased token itself.
pub struct IdentityStem;

impl Stem for IdentityStem {
    fn stem(&self, token: &str) -> String {
        token.to_string()
    }
}

/// English Snowball stemmer ("working" and "works" both index as "work").
pub struct EnglishStem(Stemmer);

impl EnglishStem {
    pub fn new() -> Self {
        Self(Stemmer::create(Algorithm::English))
    }
}

impl Default for EnglishStem {
    fn default() -> Self {
        Self::new()
    }
}

impl Stem for EnglishStem {
    fn stem(&self, token: &str) -> String {
        self.0.stem(token).into_owned()
    }
}

/// Named stemmer selection, serialized with the index so a deserialized
/// index reproduces the build-time normalization exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StemAlgorithm {
    #[default]
    Identity,
    English,
}

impl StemAlgorithm {
    fn instantiate(self) -> Arc<dyn Stem> {
        match self {
            Self::Identity => Arc::new(IdentityStem),
            Self::English => Arc::new(EnglishStem::new()),
        }
    }
}

/// Tokenizer settings, part of the serialized index format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Tokens shorter than this are discarded.
    pub min_token_length: usize,
    /// Whether [`STOP_WORDS`] are discarded.
    pub filter_stopwords: bool,
    /// Which built-in stemmer normalizes surviving tokens.
    pub stemmer: StemAlgorithm,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_token_length: DEFAULT_MIN_TOKEN_LENGTH,
            filter_stopwords: true,
            stemmer: StemAlgorithm::default(),
        }
    }
}

/// Shared build-time / query-time normalization pipeline.
///
/// Splits on non-alphanumeric boundaries, lowercases, drops short tokens and
/// stop words, then applies the configured stemmer hook.
pub struct Tokenizer {
    config: TokenizerConfig,
    stemmer: Arc<dyn Stem>,
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Tokenizer {
    pub fn new(config: TokenizerConfig) -> Self {
        let stemmer = config.stemmer.instantiate();
        Self { config, stemmer }
    }

    /// Replaces the stemmer hook with a caller-supplied implementation.
    ///
    /// A custom hook is not named by [`StemAlgorithm`], so it does not survive
    /// serialization; callers must re-attach it after deserializing.
    pub fn with_stem(config: TokenizerConfig, stemmer: Arc<dyn Stem>) -> Self {
        Self { config, stemmer }
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Tokenizes `text` into normalized index terms. Tokens that normalize to
    /// the empty string are dropped, never returned.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !c.is_alphanumeric())
            .filter_map(|raw| self.normalize(raw))
            .collect()
    }

    /// Normalizes a single raw token, returning `None` when it is filtered.
    /// Empty terms are filtered unconditionally, even at a zero minimum
    /// length and even when the stem hook empties a non-empty token.
    fn normalize(&self, raw: &str) -> Option<String> {
        if raw.is_empty() || raw.chars().count() < self.config.min_token_length {
            return None;
        }
        let lowered = raw.to_lowercase();
        if self.config.filter_stopwords && STOP_WORDS.contains(&lowered.as_str()) {
            return None;
        }
        let stemmed = self.stemmer.stem(&lowered);
        (!stemmed.is_empty()).then_some(stemmed)
    }
}
