//! Core of a single-node, append-only proof-of-work ledger.
//!
//! [`Chain`] owns an arena of [`Block`]s. Each block commits to its
//! transactions through a Merkle root, to its predecessor through a copied
//! hash, and is only admitted once mining finds a nonce whose hash meets the
//! configured difficulty.

pub mod block;
pub mod chain;
pub mod config;
pub mod constants;
pub mod error;
pub mod merkle;
pub mod pow;
pub mod transaction;

pub use block::{Block, BlockProps, BlockTemplate};
pub use chain::Chain;
pub use config::MiningConfig;
pub use error::{LedgerError, Result};
pub use merkle::{merkle_root, MerkleCommitment, MerkleError, Sha256Merkle};
pub use transaction::Transaction;

pub type Hash = [u8; constants::HASH_SIZE];
