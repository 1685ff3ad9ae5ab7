//! Portfolio valuation — snapshot recording and read models.
//!
//! A snapshot values holdings only (`Σ shares × current_price`); cash sits in
//! the currency ledger and is not part of the series. The breakdown read
//! model adds per-company aggregates and the green-impact score used for
//! leaderboards.

use crate::domain::{CompanyId, PortfolioSnapshot, UserId};
use crate::store::{CurrencyLedger, MarketStore, Tables};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-company line of a user's portfolio breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingLine {
    pub company: CompanyId,
    pub name: String,
    pub sustainability_rating: Decimal,
    pub shares: u32,
    pub invested_amount: Decimal,
    pub current_value: Decimal,
}

/// A user's aggregated holdings plus sustainability metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioBreakdown {
    pub user: UserId,
    pub holdings: Vec<HoldingLine>,
    pub total_value: Decimal,
    /// `Σ sustainability_rating × shares` over all holdings.
    pub green_impact_score: Decimal,
    /// Green-impact score divided by total shares held; zero when empty.
    pub weighted_rating: Decimal,
}

fn holdings_value(t: &Tables, user: &UserId) -> Decimal {
    t.lots
        .values()
        .filter(|lot| lot.user == *user)
        .map(|lot| {
            let price = t
                .companies
                .get(&lot.company)
                .map(|c| c.current_price)
                .unwrap_or(Decimal::ZERO);
            price * Decimal::from(lot.shares)
        })
        .sum()
}

/// Append one snapshot for `user`, valuing holdings at current prices.
/// Called inside an already-held write guard, so trade settlement and its
/// snapshot commit together.
pub(crate) fn record_snapshot_for(t: &mut Tables, user: &UserId, now: DateTime<Utc>) {
    let total_value = holdings_value(t, user);
    t.snapshots.push(PortfolioSnapshot {
        user: user.clone(),
        total_value,
        timestamp: now,
    });
}

/// Append one snapshot per registered user. Returns how many were written.
///
/// Users with no holdings still get a zero-valued snapshot, keeping every
/// series gapless.
pub(crate) fn record_snapshots(
    store: &MarketStore,
    currency: &dyn CurrencyLedger,
    now: DateTime<Utc>,
) -> usize {
    let users = currency.users();
    store.write(|t| {
        for user in &users {
            record_snapshot_for(t, user, now);
            debug!(user = %user, "portfolio snapshot recorded");
        }
    });
    users.len()
}

/// Current total holdings value for one user.
pub fn portfolio_value(store: &MarketStore, user: &UserId) -> Decimal {
    store.read(|t| holdings_value(t, user))
}

/// Per-company aggregate view of a user's holdings.
pub fn portfolio_breakdown(store: &MarketStore, user: &UserId) -> PortfolioBreakdown {
    store.read(|t| {
        let mut by_company: BTreeMap<CompanyId, (u32, Decimal)> = BTreeMap::new();
        for lot in t.lots.values().filter(|lot| lot.user == *user) {
            let entry = by_company.entry(lot.company).or_insert((0, Decimal::ZERO));
            entry.0 += lot.shares;
            entry.1 += lot.invested_amount();
        }

        let mut holdings = Vec::with_capacity(by_company.len());
        let mut total_value = Decimal::ZERO;
        let mut green_impact_score = Decimal::ZERO;
        let mut total_shares: u64 = 0;
        for (company, (shares, invested_amount)) in by_company {
            let Some(c) = t.companies.get(&company) else {
                continue;
            };
            let current_value = c.current_price * Decimal::from(shares);
            total_value += current_value;
            green_impact_score += c.sustainability_rating * Decimal::from(shares);
            total_shares += u64::from(shares);
            holdings.push(HoldingLine {
                company,
                name: c.name.clone(),
                sustainability_rating: c.sustainability_rating,
                shares,
                invested_amount,
                current_value,
            });
        }

        let weighted_rating = if total_shares == 0 {
            Decimal::ZERO
        } else {
            green_impact_score / Decimal::from(total_shares)
        };

        PortfolioBreakdown {
            user: user.clone(),
            holdings,
            total_value,
            green_impact_score,
            weighted_rating,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanySpec, InvestmentLot};
    use crate::store::InMemoryLedger;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn company(store: &MarketStore, name: &str, rating: Decimal, price: Decimal) -> CompanyId {
        store.insert_company(CompanySpec {
            name: name.into(),
            description: String::new(),
            sector: None,
            sustainability_rating: rating,
            initial_price: price,
        })
    }

    fn add_lot(
        store: &MarketStore,
        company: CompanyId,
        user: &UserId,
        shares: u32,
        purchase_price: Decimal,
    ) {
        store.write(|t| {
            let id = t.alloc_lot_id();
            t.lots.insert(
                id,
                InvestmentLot {
                    id,
                    user: user.clone(),
                    company,
                    shares,
                    purchase_price,
                    purchase_date: now(),
                },
            );
        });
    }

    #[test]
    fn value_sums_holdings_at_current_prices() {
        let store = MarketStore::new();
        let a = company(&store, "EcoGreen Energy", dec!(9.0), dec!(150.00));
        let b = company(&store, "Sustainable Farms", dec!(8.5), dec!(120.00));
        let ada = UserId::new("ada");
        add_lot(&store, a, &ada, 2, dec!(140.00));
        add_lot(&store, b, &ada, 3, dec!(120.00));

        // 2 × 150 + 3 × 120 = 660, regardless of purchase prices.
        assert_eq!(portfolio_value(&store, &ada), dec!(660.00));
    }

    #[test]
    fn record_snapshots_covers_every_registered_user() {
        let store = MarketStore::new();
        let a = company(&store, "EcoGreen Energy", dec!(9.0), dec!(150.00));
        let ada = UserId::new("ada");
        let bob = UserId::new("bob");
        let currency = InMemoryLedger::new();
        currency.register(ada.clone(), dec!(1000.00));
        currency.register(bob.clone(), dec!(1000.00));
        add_lot(&store, a, &ada, 2, dec!(150.00));

        let written = record_snapshots(&store, &currency, now());
        assert_eq!(written, 2);

        let ada_snaps = store.snapshots_for(&ada);
        assert_eq!(ada_snaps.len(), 1);
        assert_eq!(ada_snaps[0].total_value, dec!(300.00));

        // Empty portfolio still gets a gapless zero-valued point.
        let bob_snaps = store.snapshots_for(&bob);
        assert_eq!(bob_snaps.len(), 1);
        assert_eq!(bob_snaps[0].total_value, dec!(0.00));
    }

    #[test]
    fn breakdown_aggregates_lots_per_company() {
        let store = MarketStore::new();
        let a = company(&store, "EcoGreen Energy", dec!(9.0), dec!(150.00));
        let b = company(&store, "BioGreen Solutions", dec!(8.3), dec!(90.00));
        let ada = UserId::new("ada");
        add_lot(&store, a, &ada, 2, dec!(100.00));
        add_lot(&store, a, &ada, 1, dec!(140.00));
        add_lot(&store, b, &ada, 5, dec!(80.00));

        let breakdown = portfolio_breakdown(&store, &ada);
        assert_eq!(breakdown.holdings.len(), 2);

        let line_a = breakdown.holdings.iter().find(|h| h.company == a).unwrap();
        assert_eq!(line_a.shares, 3);
        assert_eq!(line_a.invested_amount, dec!(340.00));
        assert_eq!(line_a.current_value, dec!(450.00));

        assert_eq!(breakdown.total_value, dec!(900.00));
        // 9.0 × 3 + 8.3 × 5 = 68.5
        assert_eq!(breakdown.green_impact_score, dec!(68.5));
        assert_eq!(breakdown.weighted_rating, dec!(68.5) / dec!(8));
    }

    #[test]
    fn empty_portfolio_breakdown_is_all_zero() {
        let store = MarketStore::new();
        let nobody = UserId::new("nobody");
        let breakdown = portfolio_breakdown(&store, &nobody);
        assert!(breakdown.holdings.is_empty());
        assert_eq!(breakdown.total_value, Decimal::ZERO);
        assert_eq!(breakdown.green_impact_score, Decimal::ZERO);
        assert_eq!(breakdown.weighted_rating, Decimal::ZERO);
    }
}
