//! Append-only chain of mined blocks.
//!
//! Blocks live in an arena in insertion order. Each block records the arena
//! position of its predecessor, and `head` is the position of the newest
//! block, so walking `prev_block` links from the head visits the whole chain
//! newest-first.

use tracing::{debug, info};

use crate::{
    merkle::{MerkleCommitment, Sha256Merkle},
    pow::meets_difficulty,
    Block, BlockTemplate, LedgerError, MiningConfig, Result, Transaction,
};

#[derive(Clone, Debug)]
pub struct Chain<M: MerkleCommitment = Sha256Merkle> {
    blocks: Vec<Block>,
    head: Option<usize>,
    config: MiningConfig,
    merkle: M,
}

impl Chain<Sha256Merkle> {
    /// A chain holding only a freshly mined genesis block.
    pub fn new() -> Result<Self> {
        Self::with_config(MiningConfig::default())
    }

    pub fn with_config(config: MiningConfig) -> Result<Self> {
        Self::with_merkle(config, Sha256Merkle)
    }
}

impl<M: MerkleCommitment> Chain<M> {
    pub fn with_merkle(config: MiningConfig, merkle: M) -> Result<Self> {
        config.validate()?;
        let genesis = Block::mine_with(BlockTemplate::genesis(), &config, &merkle)?;
        info!(
            difficulty = config.difficulty,
            hash = %hex::encode(genesis.hash()),
            "created chain"
        );
        Ok(Self {
            blocks: vec![genesis],
            head: Some(0),
            config,
            merkle,
        })
    }

    pub fn config(&self) -> &MiningConfig {
        &self.config
    }

    /// The most recent block, `None` only on an uninitialized chain.
    pub fn latest_block(&self) -> Option<&Block> {
        self.head.and_then(|pos| self.blocks.get(pos))
    }

    pub fn get(&self, position: usize) -> Option<&Block> {
        self.blocks.get(position)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Walks predecessor links from the head back to genesis.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            blocks: &self.blocks,
            next: self.head,
        }
    }

    /// Mines `transactions` into a new block on top of the current head and
    /// makes it the head.
    pub fn add_block(&mut self, transactions: Vec<Transaction>) -> Result<&Block> {
        let head = self.head.ok_or(LedgerError::UninitializedChain)?;
        let prev = self
            .blocks
            .get(head)
            .ok_or(LedgerError::UninitializedChain)?;

        let template = BlockTemplate {
            index: prev.index() + 1,
            transactions,
            prev_block: Some(head),
            prev_hash: Some(*prev.hash()),
        };
        let block = Block::mine_with(template, &self.config, &self.merkle)?;

        self.blocks.push(block);
        let position = self.blocks.len() - 1;
        self.head = Some(position);
        Ok(&self.blocks[position])
    }

    /// Checks every block from the head back to genesis: stored hash equals
    /// the recomputed hash and meets the difficulty, `prev_hash` equals the
    /// predecessor's hash, and indices step by one. Genesis is re-hashed too.
    ///
    /// `Ok(false)` means the chain is corrupt; `Err` means a hash could not be
    /// computed at all.
    pub fn is_chain_valid(&self) -> Result<bool> {
        let Some(mut position) = self.head else {
            debug!("chain has no head");
            return Ok(false);
        };

        loop {
            let Some(block) = self.blocks.get(position) else {
                debug!(position, "dangling block reference");
                return Ok(false);
            };

            if block.calc_hash_with(&self.merkle)? != *block.hash() {
                debug!(index = block.index(), "stored hash does not match contents");
                return Ok(false);
            }
            if !meets_difficulty(block.hash(), self.config.difficulty) {
                debug!(index = block.index(), "hash misses the difficulty target");
                return Ok(false);
            }

            let Some(prev_position) = block.prev_block() else {
                if block.prev_hash().is_some() || block.index() != crate::constants::GENESIS_INDEX {
                    debug!(index = block.index(), "malformed genesis block");
                    return Ok(false);
                }
                return Ok(true);
            };
            let Some(prev) = self.blocks.get(prev_position) else {
                debug!(index = block.index(), prev_position, "predecessor missing");
                return Ok(false);
            };
            if block.prev_hash() != Some(prev.hash()) {
                debug!(index = block.index(), "prev_hash does not match predecessor");
                return Ok(false);
            }
            if block.index() != prev.index() + 1 {
                debug!(index = block.index(), "index does not follow predecessor");
                return Ok(false);
            }
            position = prev_position;
        }
    }
}

/// Iterator over a chain from head to genesis.
pub struct Ancestors<'a> {
    blocks: &'a [Block],
    next: Option<usize>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.blocks.get(self.next?)?;
        self.next = block.prev_block();
        Some(block)
    }
}
