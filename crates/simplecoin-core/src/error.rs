//! Error types for the ledger core.

use std::path::PathBuf;

use thiserror::Error;

use crate::merkle::MerkleError;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The transaction commitment could not be computed.
    #[error("hash computation failed: {0}")]
    Merkle(#[from] MerkleError),

    #[error("chain has not been initialized")]
    UninitializedChain,

    /// `attempts` is the configured ceiling, or 2^64 after an unbounded search.
    #[error("no nonce satisfied the difficulty target after {attempts} attempts")]
    NonceSpaceExhausted { attempts: u128 },

    #[error("difficulty {difficulty} exceeds the maximum of {max}")]
    DifficultyOutOfRange { difficulty: u32, max: u32 },

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, LedgerError>;
