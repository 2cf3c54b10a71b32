//! Blocks and their proof-of-work.
//!
//! A block's hash covers, in order:
//! ```text
//! index (u64 LE) || timestamp (RFC 3339, ns, Z) || merkle root || prev hash (if any) || nonce (decimal)
//! ```
//! Everything before the nonce is fixed once the block is built, so mining
//! computes that prefix once and only re-hashes the nonce suffix.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::{
    constants::HASH_SIZE,
    merkle::{leaves, MerkleCommitment, Sha256Merkle},
    pow::{hash_with_nonce, search_nonce, search_nonce_parallel},
    Hash, LedgerError, MiningConfig, Result, Transaction,
};

/// Caller-controlled inputs for a new block. Nonce and hash are never
/// supplied; they come out of mining.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockTemplate {
    pub index: u64,
    pub transactions: Vec<Transaction>,
    /// Arena position of the predecessor within its chain.
    pub prev_block: Option<usize>,
    pub prev_hash: Option<Hash>,
}

impl BlockTemplate {
    pub fn genesis() -> Self {
        Self {
            index: crate::constants::GENESIS_INDEX,
            transactions: Vec::new(),
            prev_block: None,
            prev_hash: None,
        }
    }
}

/// Owned snapshot of a block's properties.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockProps {
    pub index: u64,
    pub timestamp: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub prev_block: Option<usize>,
    pub prev_hash: Option<Hash>,
    pub nonce: u64,
    pub hash: Hash,
}

/// A mined block. Fields are frozen after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    pub(crate) index: u64,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) prev_block: Option<usize>,
    pub(crate) prev_hash: Option<Hash>,
    pub(crate) nonce: u64,
    pub(crate) hash: Hash,
}

impl Block {
    /// Builds and mines a block with the default Merkle committer and an
    /// unbounded sequential nonce search.
    pub fn new(template: BlockTemplate, difficulty: u32) -> Result<Self> {
        let config = MiningConfig {
            difficulty,
            ..MiningConfig::default()
        };
        Self::mine_with(template, &config, &Sha256Merkle)
    }

    pub fn mine_with<M: MerkleCommitment + ?Sized>(
        template: BlockTemplate,
        config: &MiningConfig,
        merkle: &M,
    ) -> Result<Self> {
        config.validate()?;
        let BlockTemplate {
            index,
            transactions,
            prev_block,
            prev_hash,
        } = template;
        let timestamp = Utc::now();

        let prefix = hash_prefix(index, &timestamp, &transactions, prev_hash.as_ref(), merkle)?;
        let found = if config.parallel {
            search_nonce_parallel(&prefix, config.difficulty, config.max_attempts)
        } else {
            search_nonce(&prefix, config.difficulty, config.max_attempts)
        };
        let (nonce, hash) = found.ok_or(LedgerError::NonceSpaceExhausted {
            attempts: config
                .max_attempts
                .map_or(1u128 << 64, u128::from),
        })?;

        info!(
            index,
            nonce,
            hash = %hex::encode(hash),
            "mined block"
        );

        Ok(Self {
            index,
            timestamp,
            transactions,
            prev_block,
            prev_hash,
            nonce,
            hash,
        })
    }

    pub fn props(&self) -> BlockProps {
        BlockProps {
            index: self.index,
            timestamp: self.timestamp,
            transactions: self.transactions.clone(),
            prev_block: self.prev_block,
            prev_hash: self.prev_hash,
            nonce: self.nonce,
            hash: self.hash,
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn prev_block(&self) -> Option<usize> {
        self.prev_block
    }

    pub fn prev_hash(&self) -> Option<&Hash> {
        self.prev_hash.as_ref()
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    pub fn is_genesis(&self) -> bool {
        self.prev_block.is_none()
    }

    /// Recomputes the content hash from the stored fields.
    pub fn calc_hash(&self) -> Result<Hash> {
        self.calc_hash_with(&Sha256Merkle)
    }

    pub fn calc_hash_with<M: MerkleCommitment + ?Sized>(&self, merkle: &M) -> Result<Hash> {
        let prefix = hash_prefix(
            self.index,
            &self.timestamp,
            &self.transactions,
            self.prev_hash.as_ref(),
            merkle,
        )?;
        Ok(hash_with_nonce(&prefix, self.nonce))
    }
}

/// Canonical timestamp rendering used in the hash preimage.
pub fn timestamp_string(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn hash_prefix<M: MerkleCommitment + ?Sized>(
    index: u64,
    timestamp: &DateTime<Utc>,
    transactions: &[Transaction],
    prev_hash: Option<&Hash>,
    merkle: &M,
) -> Result<Vec<u8>> {
    let root = merkle.root(&leaves(transactions))?;
    let ts = timestamp_string(timestamp);

    let mut bytes = Vec::with_capacity(8 + ts.len() + HASH_SIZE * 2 + 20);
    bytes.extend_from_slice(&index.to_le_bytes());
    bytes.extend_from_slice(ts.as_bytes());
    bytes.extend_from_slice(&root);
    if let Some(prev) = prev_hash {
        bytes.extend_from_slice(prev);
    }
    Ok(bytes)
}
