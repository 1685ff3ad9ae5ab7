//! Market events — timed, randomly generated price modifiers.

use super::ids::{CompanyId, EventId};
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A market event biasing a subset of companies' price changes while active.
///
/// Immutable once created; "active" is derived from `created_at + duration`.
/// Events are never deleted — expired rows stay behind as the historical
/// record shown on the events page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketEvent {
    pub id: EventId,
    pub title: String,
    pub description: String,
    /// Signed fraction, e.g. 0.10 = +10% per tick while active.
    pub impact_factor: Decimal,
    pub created_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub affected_companies: Vec<CompanyId>,
}

impl MarketEvent {
    pub fn end_time(&self) -> DateTime<Utc> {
        self.created_at + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Active iff `now < created_at + duration`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        now < self.end_time()
    }

    /// Whole minutes until expiry, `None` once expired.
    pub fn minutes_remaining(&self, now: DateTime<Utc>) -> Option<i64> {
        let remaining = self.end_time() - now;
        if remaining > Duration::zero() {
            Some(remaining.num_minutes())
        } else {
            None
        }
    }

    pub fn affects(&self, company: CompanyId) -> bool {
        self.affected_companies.contains(&company)
    }
}
