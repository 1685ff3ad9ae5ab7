//! Stock-reset watchdog — recovers chronically depressed prices.
//!
//! A price below the reset threshold starts a countdown; if it stays below
//! for the whole window, the company is treated as failed-and-relaunched:
//! every investor position in it is wiped (hard liquidation, no settlement)
//! and the price resets to the baseline. Each company's reset — lot deletion
//! plus price reset plus flag clear — commits as one atomic unit, so an
//! interrupted sweep simply re-evaluates from persisted state on the next
//! run.

use crate::config::MarketConfig;
use crate::domain::{CompanyId, LotId, UserId};
use crate::store::MarketStore;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// One liquidation performed by a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetRecord {
    pub company: CompanyId,
    pub name: String,
    pub shares_removed: u64,
    pub users_affected: Vec<UserId>,
}

/// Outcome of one watchdog pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepReport {
    pub resets: Vec<ResetRecord>,
    /// Companies below the threshold still inside their countdown window.
    pub pending: usize,
}

/// Evaluate every company against the reset condition.
pub(crate) fn sweep_low_value_stocks(
    store: &MarketStore,
    config: &MarketConfig,
    now: DateTime<Utc>,
) -> SweepReport {
    let window = Duration::minutes(config.reset_window_minutes);
    let mut report = SweepReport::default();

    store.write(|t| {
        let low_ids: Vec<CompanyId> = t
            .companies
            .values()
            .filter(|c| c.current_price < config.reset_threshold)
            .map(|c| c.id)
            .collect();

        for id in low_ids {
            let company = match t.companies.get_mut(&id) {
                Some(c) => c,
                None => continue,
            };

            // The pricing engine normally owns this flag; set it here too in
            // case the sweep observes the low price before the next tick.
            let low_since = *company.price_low_since.get_or_insert(now);

            if now - low_since < window {
                debug!(company = %id, name = %company.name, "below threshold, window not yet elapsed");
                report.pending += 1;
                continue;
            }

            company.current_price = config.reset_price;
            company.price_low_since = None;
            let name = company.name.clone();

            let doomed: Vec<LotId> = t
                .lots
                .values()
                .filter(|lot| lot.company == id)
                .map(|lot| lot.id)
                .collect();
            let mut shares_removed: u64 = 0;
            let mut users_affected: Vec<UserId> = Vec::new();
            for lot_id in doomed {
                if let Some(lot) = t.lots.remove(&lot_id) {
                    shares_removed += u64::from(lot.shares);
                    if !users_affected.contains(&lot.user) {
                        users_affected.push(lot.user);
                    }
                }
            }

            info!(
                company = %id,
                name = %name,
                reset_price = %config.reset_price,
                shares_removed,
                users = users_affected.len(),
                "low-value stock reset, positions liquidated"
            );
            report.resets.push(ResetRecord {
                company: id,
                name,
                shares_removed,
                users_affected,
            });
        }
    });

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanySpec, InvestmentLot};
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn store_with_company(price: Decimal) -> (MarketStore, CompanyId) {
        let store = MarketStore::new();
        let id = store.insert_company(CompanySpec {
            name: "Sustainable Farms".into(),
            description: String::new(),
            sector: None,
            sustainability_rating: dec!(8.5),
            initial_price: price,
        });
        (store, id)
    }

    fn add_lot(store: &MarketStore, company: CompanyId, user: &str, shares: u32) {
        store.write(|t| {
            let id = t.alloc_lot_id();
            t.lots.insert(
                id,
                InvestmentLot {
                    id,
                    user: UserId::new(user),
                    company,
                    shares,
                    purchase_price: dec!(100.00),
                    purchase_date: now(),
                },
            );
        });
    }

    fn set_low_since(store: &MarketStore, company: CompanyId, at: DateTime<Utc>) {
        store.write(|t| {
            t.companies.get_mut(&company).unwrap().price_low_since = Some(at);
        });
    }

    #[test]
    fn healthy_company_is_untouched() {
        let (store, id) = store_with_company(dec!(100.00));
        add_lot(&store, id, "ada", 10);

        let report = sweep_low_value_stocks(&store, &MarketConfig::default(), now());
        assert!(report.resets.is_empty());
        assert_eq!(report.pending, 0);
        assert_eq!(store.company(id).unwrap().current_price, dec!(100.00));
        assert_eq!(store.holding(&UserId::new("ada"), id), 10);
    }

    #[test]
    fn low_price_inside_window_is_pending_not_reset() {
        let (store, id) = store_with_company(dec!(1.20));
        add_lot(&store, id, "ada", 10);
        set_low_since(&store, id, now() - Duration::seconds(90));

        let report = sweep_low_value_stocks(&store, &MarketConfig::default(), now());
        assert!(report.resets.is_empty());
        assert_eq!(report.pending, 1);
        // Position survives; flag stays set.
        assert_eq!(store.holding(&UserId::new("ada"), id), 10);
        assert!(store.company(id).unwrap().price_low_since.is_some());
    }

    #[test]
    fn low_price_past_window_resets_and_liquidates() {
        let (store, id) = store_with_company(dec!(1.20));
        add_lot(&store, id, "ada", 10);
        add_lot(&store, id, "bob", 3);
        set_low_since(&store, id, now() - Duration::minutes(2));

        let report = sweep_low_value_stocks(&store, &MarketConfig::default(), now());
        assert_eq!(report.resets.len(), 1);
        let reset = &report.resets[0];
        assert_eq!(reset.shares_removed, 13);
        assert_eq!(reset.users_affected.len(), 2);

        let company = store.company(id).unwrap();
        assert_eq!(company.current_price, dec!(100.00));
        assert!(company.price_low_since.is_none());
        assert_eq!(store.holding(&UserId::new("ada"), id), 0);
        assert_eq!(store.holding(&UserId::new("bob"), id), 0);
    }

    #[test]
    fn sweep_sets_flag_when_unset() {
        let (store, id) = store_with_company(dec!(1.20));

        let report = sweep_low_value_stocks(&store, &MarketConfig::default(), now());
        assert_eq!(report.pending, 1);
        assert_eq!(store.company(id).unwrap().price_low_since, Some(now()));

        // Second sweep after the window elapses triggers the reset.
        let later = now() + Duration::minutes(2);
        let report = sweep_low_value_stocks(&store, &MarketConfig::default(), later);
        assert_eq!(report.resets.len(), 1);
    }

    #[test]
    fn liquidation_only_touches_the_reset_company() {
        let (store, low) = store_with_company(dec!(1.20));
        let healthy = store.insert_company(CompanySpec {
            name: "EcoTech Innovations".into(),
            description: String::new(),
            sector: None,
            sustainability_rating: dec!(8.0),
            initial_price: dec!(180.00),
        });
        add_lot(&store, low, "ada", 10);
        add_lot(&store, healthy, "ada", 4);
        set_low_since(&store, low, now() - Duration::minutes(5));

        sweep_low_value_stocks(&store, &MarketConfig::default(), now());
        assert_eq!(store.holding(&UserId::new("ada"), low), 0);
        assert_eq!(store.holding(&UserId::new("ada"), healthy), 4);
    }

    #[test]
    fn rerun_after_reset_is_a_no_op() {
        let (store, id) = store_with_company(dec!(1.20));
        add_lot(&store, id, "ada", 10);
        set_low_since(&store, id, now() - Duration::minutes(2));

        let first = sweep_low_value_stocks(&store, &MarketConfig::default(), now());
        assert_eq!(first.resets.len(), 1);

        let second = sweep_low_value_stocks(&store, &MarketConfig::default(), now());
        assert!(second.resets.is_empty());
        assert_eq!(second.pending, 0);
    }
}
