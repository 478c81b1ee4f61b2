//! Payout boundary.
//!
//! Settlement pays `total_funding + matching_amount` to the project creator
//! through a [`PayoutSink`]. The sink is the one external, fallible step in
//! the ledger: it runs inside the same critical section as the state
//! mutations, and a failure rolls the whole distribution back.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use thiserror::Error;

use crate::types::Address;

/// Failure reported by a [`PayoutSink`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct PayoutError(pub String);

/// Destination for settled funds.
///
/// Implementations must be synchronous: the transfer either completes before
/// returning or reports an error, so the caller can roll back atomically.
pub trait PayoutSink: Send + Sync {
    fn transfer(&mut self, to: &Address, amount: i128) -> Result<(), PayoutError>;
}

/// In-memory balance book.
///
/// Clones share the same underlying balances, so a test or embedder can keep
/// a handle and inspect balances after handing a clone to the ledger.
#[derive(Clone, Debug, Default)]
pub struct MemoryTreasury {
    balances: Arc<Mutex<HashMap<Address, i128>>>,
}

impl MemoryTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current balance credited to `address` (0 when never paid).
    pub fn balance_of(&self, address: &Address) -> i128 {
        let balances = self.balances.lock().expect("treasury lock poisoned");
        balances.get(address).copied().unwrap_or(0)
    }
}

impl PayoutSink for MemoryTreasury {
    fn transfer(&mut self, to: &Address, amount: i128) -> Result<(), PayoutError> {
        if amount < 0 {
            return Err(PayoutError(format!("negative transfer amount {amount}")));
        }
        let mut balances = self.balances.lock().expect("treasury lock poisoned");
        let entry = balances.entry(to.clone()).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or_else(|| PayoutError(format!("balance overflow for {to}")))?;
        Ok(())
    }
}
