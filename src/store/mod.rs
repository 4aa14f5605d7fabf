//! Storage backends for accounts and the score log
//!
//! Two traits, each with an in-memory backend for tests and a JSON-file
//! backend for real use. The session layer only ever talks to the traits, so
//! a failing or swapped-out backend never changes run semantics.

pub mod accounts;
pub mod scores;

pub use accounts::{Account, AccountStore, JsonAccounts, MemoryAccounts};
pub use scores::{JsonScores, MemoryScores, ScoreEntry, ScoreLog};

/// Errors shared by all backends
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Seconds since the Unix epoch; clamps to 0 on a pre-epoch clock
pub(crate) fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
