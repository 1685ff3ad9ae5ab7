//! Portfolio snapshots — the point-in-time net-worth series behind charts.

use super::ids::UserId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One appended snapshot of a user's total holdings value.
///
/// Written after every settled trade and by the periodic valuation job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub user: UserId,
    pub total_value: Decimal,
    pub timestamp: DateTime<Utc>,
}
