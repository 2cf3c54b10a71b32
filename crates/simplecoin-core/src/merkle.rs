//! Merkle commitment over an ordered list of leaves.
//!
//! The block hash only needs a single root binding the transaction set, so the
//! committer sits behind [`MerkleCommitment`] and [`Sha256Merkle`] is the
//! default. An empty leaf list commits to the all-zero sentinel, which is what
//! every genesis block carries.

use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::{constants::HASH_SIZE, Hash, Transaction};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    #[error("leaf {position} is empty")]
    EmptyLeaf { position: usize },
}

pub trait MerkleCommitment: Send + Sync {
    fn root(&self, leaves: &[Vec<u8>]) -> Result<Hash, MerkleError>;
}

/// Binary SHA-256 tree; an odd node at any level is paired with itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Merkle;

impl MerkleCommitment for Sha256Merkle {
    fn root(&self, leaves: &[Vec<u8>]) -> Result<Hash, MerkleError> {
        if leaves.is_empty() {
            return Ok([0u8; HASH_SIZE]);
        }
        let mut level = leaves
            .iter()
            .enumerate()
            .map(|(position, leaf)| {
                if leaf.is_empty() {
                    return Err(MerkleError::EmptyLeaf { position });
                }
                Ok(sha256(&[leaf.as_slice()]))
            })
            .collect::<Result<Vec<Hash>, _>>()?;

        while level.len() > 1 {
            level = level
                .chunks(2)
                .map(|pair| match pair {
                    [a, b] => sha256(&[&a[..], &b[..]]),
                    [a] => sha256(&[&a[..], &a[..]]),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
        }
        Ok(level[0])
    }
}

/// Root of `txs` under the default committer.
pub fn merkle_root(txs: &[Transaction]) -> Result<Hash, MerkleError> {
    Sha256Merkle.root(&leaves(txs))
}

pub(crate) fn leaves(txs: &[Transaction]) -> Vec<Vec<u8>> {
    txs.iter().map(Transaction::leaf_bytes).collect()
}

fn sha256(parts: &[&[u8]]) -> Hash {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
