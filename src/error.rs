//! Error handling types for index building, loading, and querying.

use thiserror::Error;

/// A specialized Result type for docsearch operations.
pub type Result<T, E = IndexError> = std::result::Result<T, E>;

/// All failure modes surfaced by this crate.
///
/// Build failures are all-or-nothing: a failed build never publishes a
/// partial index. Query time can only fail with [`IndexError::Incompatible`],
/// which the caller recovers from by triggering a rebuild.
#[derive(Error, Debug)]
pub enum IndexError {
    /// A document triple was submitted without a docname.
    #[error("document {index} has an empty docname")]
    EmptyDocname { index: usize },

    /// An object entry referenced a docid outside the document array.
    #[error("object '{name}' references unknown document {doc}")]
    UnknownDocument { name: String, doc: u32 },

    /// A build was abandoned via its cancellation token.
    #[error("index build cancelled")]
    BuildCancelled,

    /// The loaded index was produced against a different schema version set.
    /// Detected at load or query time, always before any postings are read.
    #[error("incompatible index: {reason}")]
    Incompatible { reason: String },

    /// A term id was resolved that this index never produced. Ids are only
    /// valid against the interner that minted them, so hitting this is an
    /// internal invariant violation, not a caller-recoverable state.
    #[error("unknown term id {0}")]
    UnknownTerm(u32),

    /// The interchange document could not be parsed.
    #[error("malformed index document: {0}")]
    Json(#[from] serde_json::Error),

    /// The binary snapshot could not be decoded.
    #[error("malformed index snapshot: {0}")]
    Snapshot(#[from] postcard::Error),

    /// Snapshot file I/O failed.
    #[error("snapshot io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn display_carries_context() {
        let err = IndexError::EmptyDocname { index: 3 };
        check!(err.to_string() == "document 3 has an empty docname");

        let err = IndexError::Incompatible {
            reason: "domain 'api': index has 2, expected 3".to_string(),
        };
        check!(err.to_string().contains("domain 'api'"));
    }
}
