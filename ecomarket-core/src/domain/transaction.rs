//! Transactions — the append-only audit trail of every settled trade.

use super::ids::{CompanyId, TransactionId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Buy,
    Sell,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Buy => write!(f, "buy"),
            TransactionKind::Sell => write!(f, "sell"),
        }
    }
}

/// Immutable record of one settled buy or sell.
///
/// `price_per_share` is the market price the trade settled against. For sells
/// `total` is the net amount credited after tax, so `total` is not always
/// `shares × price_per_share`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub user: UserId,
    pub company: CompanyId,
    pub kind: TransactionKind,
    pub shares: u32,
    pub price_per_share: Decimal,
    pub total: Decimal,
    pub timestamp: DateTime<Utc>,
}
