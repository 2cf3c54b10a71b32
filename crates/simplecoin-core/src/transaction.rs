use serde::{Deserialize, Serialize};
use std::fmt;

/// A transfer of coin from one party to another.
///
/// The core never validates balances or signatures; a transaction is an
/// opaque record that only needs a stable rendering for the Merkle leaves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub from: String,
    pub to: String,
    pub amount: f64,
}

impl Transaction {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    /// Bytes fed to the Merkle commitment for this transaction.
    pub fn leaf_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

/// Renders as `{from to amount}`.
impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} {} {}}}", self.from, self.to, self.amount)
    }
}
