//! Company — a tradable listing with a price and a sustainability rating.

use super::ids::CompanyId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A tradable company.
///
/// `current_price` is mutated on every price-update tick and never drops
/// below the 1.00 floor. `price_low_since` is the watchdog's low-price marker:
/// set when the price first lands below the reset threshold, cleared on
/// recovery or reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub description: String,
    pub sector: Option<String>,
    /// 0–10 eco score, used for the green-impact read model.
    pub sustainability_rating: Decimal,
    pub current_price: Decimal,
    pub price_low_since: Option<DateTime<Utc>>,
}

/// Seed-time description of a company, before the store assigns an ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySpec {
    pub name: String,
    pub description: String,
    pub sector: Option<String>,
    pub sustainability_rating: Decimal,
    pub initial_price: Decimal,
}

impl Company {
    pub fn from_spec(id: CompanyId, spec: CompanySpec) -> Self {
        Self {
            id,
            name: spec.name,
            description: spec.description,
            sector: spec.sector,
            sustainability_rating: spec.sustainability_rating,
            current_price: spec.initial_price,
            price_low_since: None,
        }
    }
}

/// One appended price-history row: (company, price, timestamp).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub company: CompanyId,
    pub price: Decimal,
    pub timestamp: DateTime<Utc>,
}
