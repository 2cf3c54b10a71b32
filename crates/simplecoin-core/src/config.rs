//! Mining configuration.

use serde::Deserialize;
use std::{fs, path::Path};

use crate::{
    constants::{DEFAULT_DIFFICULTY, HASH_HEX_SIZE},
    LedgerError, Result,
};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct MiningConfig {
    /// Required leading `'0'` hex characters in every block hash.
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Opt-in ceiling on nonces tried per block; `None` mines until success.
    #[serde(default)]
    pub max_attempts: Option<u64>,
    /// Spread the nonce search over the rayon thread pool.
    #[serde(default)]
    pub parallel: bool,
}

fn default_difficulty() -> u32 {
    DEFAULT_DIFFICULTY
}

impl Default for MiningConfig {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: None,
            parallel: false,
        }
    }
}

impl MiningConfig {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: MiningConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LedgerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        let max = HASH_HEX_SIZE as u32;
        if self.difficulty > max {
            return Err(LedgerError::DifficultyOutOfRange {
                difficulty: self.difficulty,
                max,
            });
        }
        Ok(())
    }
}
