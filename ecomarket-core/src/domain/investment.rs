//! Investment lots — one row per buy, the unit of FIFO accounting.

use super::ids::{CompanyId, LotId, UserId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single buy's worth of shares.
///
/// Lots are never merged, even when a user buys the same company at the same
/// price twice — each buy stands alone so sells can consume holdings
/// oldest-first. A lot is deleted when fully sold; a partially sold lot has
/// `shares` decremented in place and keeps its original `purchase_price`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentLot {
    pub id: LotId,
    pub user: UserId,
    pub company: CompanyId,
    pub shares: u32,
    pub purchase_price: Decimal,
    pub purchase_date: DateTime<Utc>,
}

impl InvestmentLot {
    /// Cost basis of the whole lot at purchase time.
    pub fn invested_amount(&self) -> Decimal {
        self.purchase_price * Decimal::from(self.shares)
    }

    /// Mark-to-market value at the given price.
    pub fn market_value(&self, current_price: Decimal) -> Decimal {
        current_price * Decimal::from(self.shares)
    }
}
