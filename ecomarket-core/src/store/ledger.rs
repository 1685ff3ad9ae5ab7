//! Currency ledger boundary.
//!
//! The game's in-game currency lives outside the market core; the core only
//! needs `credit` and `debit`. `InMemoryLedger` is the reference
//! implementation used by the CLI and tests — the web application substitutes
//! its own, backed by the shared wallet table.

use crate::domain::UserId;
use crate::error::{MarketError, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Debit/credit direction on an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerSide {
    Credit,
    Debit,
}

/// Append-only audit row for every balance mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub user: UserId,
    pub side: LedgerSide,
    pub amount: Decimal,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// The balance operations the market core requires.
///
/// `debit` returns `Ok(false)` on insufficient funds without mutating
/// anything; both calls fail with `UserNotFound` for unregistered users.
/// `users()` enumerates registered users — the valuation snapshot job's
/// equivalent of "every user with a profile".
pub trait CurrencyLedger: Send + Sync {
    fn credit(&self, user: &UserId, amount: Decimal, reason: &str) -> Result<()>;
    fn debit(&self, user: &UserId, amount: Decimal, reason: &str) -> Result<bool>;
    fn balance(&self, user: &UserId) -> Option<Decimal>;
    fn users(&self) -> Vec<UserId>;
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: BTreeMap<UserId, Decimal>,
    audit: Vec<LedgerEntry>,
}

/// In-memory, audit-recording currency ledger.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user with an opening balance. Registering twice resets the
    /// balance, which only the CLI's seed path does.
    pub fn register(&self, user: UserId, opening_balance: Decimal) {
        self.state.write().balances.insert(user, opening_balance);
    }

    pub fn audit_trail(&self) -> Vec<LedgerEntry> {
        self.state.read().audit.clone()
    }
}

impl CurrencyLedger for InMemoryLedger {
    fn credit(&self, user: &UserId, amount: Decimal, reason: &str) -> Result<()> {
        let mut state = self.state.write();
        let balance = state
            .balances
            .get_mut(user)
            .ok_or_else(|| MarketError::UserNotFound(user.clone()))?;
        *balance += amount;
        state.audit.push(LedgerEntry {
            user: user.clone(),
            side: LedgerSide::Credit,
            amount,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        });
        Ok(())
    }

    fn debit(&self, user: &UserId, amount: Decimal, reason: &str) -> Result<bool> {
        let mut state = self.state.write();
        let balance = state
            .balances
            .get_mut(user)
            .ok_or_else(|| MarketError::UserNotFound(user.clone()))?;
        if *balance < amount {
            return Ok(false);
        }
        *balance -= amount;
        state.audit.push(LedgerEntry {
            user: user.clone(),
            side: LedgerSide::Debit,
            amount,
            reason: reason.to_string(),
            timestamp: Utc::now(),
        });
        Ok(true)
    }

    fn balance(&self, user: &UserId) -> Option<Decimal> {
        self.state.read().balances.get(user).copied()
    }

    fn users(&self) -> Vec<UserId> {
        self.state.read().balances.keys().cloned().collect()
    }
}
