//! Price update engine — one tick recomputes every company's price.
//!
//! Three additive components per company:
//! 1. Base fluctuation: uniform random draw in ±2% (drawn as whole basis
//!    points, so the 4 dp quantization is exact)
//! 2. Mean reversion: pulls toward the target price proportionally to the
//!    relative deviation
//! 3. Event impact: sum of impact factors of currently-active events
//!
//! `new = round_half_up(old × (1 + net), 2)`, clamped to the 1.00 floor.
//! Every tick appends exactly one history point per company, and no company
//! is skipped. Companies are independent, so the sweep runs rayon-parallel;
//! per-company sub-seeded RNG keeps the result identical regardless of
//! scheduling order.

use crate::config::MarketConfig;
use crate::domain::{Company, CompanyId, MarketEvent, PricePoint};
use crate::rng::SeedHierarchy;
use crate::store::MarketStore;
use chrono::{DateTime, Utc};
use rand::Rng;
use rayon::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// The outcome of one company's tick, kept for logging and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceChange {
    pub company: CompanyId,
    pub old_price: Decimal,
    pub new_price: Decimal,
    pub base_change: Decimal,
    pub mean_reversion: Decimal,
    pub event_impact: Decimal,
}

/// Mean reversion toward the target: `((target − price) / target) × strength`.
pub fn mean_reversion(price: Decimal, config: &MarketConfig) -> Decimal {
    ((config.target_price - price) / config.target_price) * config.mean_reversion_strength
}

/// Sum of impact factors over the company's currently-active events.
pub fn event_impact(company: CompanyId, events: &[MarketEvent], now: DateTime<Utc>) -> Decimal {
    events
        .iter()
        .filter(|e| e.is_active(now) && e.affects(company))
        .map(|e| e.impact_factor)
        .sum()
}

/// Apply one tick's net change to a price: multiply, round half-up to cents,
/// clamp to the floor.
pub fn apply_net_change(price: Decimal, net_change: Decimal, config: &MarketConfig) -> Decimal {
    let new_price = (price * (Decimal::ONE + net_change))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    new_price.max(config.price_floor)
}

/// Advance one company by one tick, maintaining the low-price flag.
///
/// The flag transitions here, not in the watchdog: it is set the tick the
/// price lands below the reset threshold and cleared the tick it recovers,
/// so a transient dip can never trigger a reset after the price has already
/// recovered.
fn tick_company(
    company: &mut Company,
    base_change: Decimal,
    events: &[MarketEvent],
    config: &MarketConfig,
    now: DateTime<Utc>,
) -> PriceChange {
    let old_price = company.current_price;
    let reversion = mean_reversion(old_price, config);
    let impact = event_impact(company.id, events, now);
    let net_change = base_change + reversion + impact;
    let new_price = apply_net_change(old_price, net_change, config);

    company.current_price = new_price;
    if new_price < config.reset_threshold {
        if company.price_low_since.is_none() {
            company.price_low_since = Some(now);
        }
    } else {
        company.price_low_since = None;
    }

    PriceChange {
        company: company.id,
        old_price,
        new_price,
        base_change,
        mean_reversion: reversion,
        event_impact: impact,
    }
}

/// One price tick across every company, inside a single store transaction.
pub(crate) fn update_all_prices(
    store: &MarketStore,
    config: &MarketConfig,
    seeds: &SeedHierarchy,
    now: DateTime<Utc>,
    tick: u64,
) -> Vec<PriceChange> {
    store.write(|t| {
        let events = &t.events;
        let mut companies: Vec<&mut Company> = t.companies.values_mut().collect();

        let changes: Vec<PriceChange> = companies
            .par_iter_mut()
            .map(|company| {
                let company: &mut Company = company;
                let mut rng = seeds.rng_for("prices", &company.id.to_string(), tick);
                // Whole basis points, so the ±2% draw is exact at 4 dp.
                let bps = rng.gen_range(-config.noise_bps_max..=config.noise_bps_max);
                let base_change = Decimal::new(bps, 4);
                tick_company(company, base_change, events, config, now)
            })
            .collect();

        for change in &changes {
            t.price_history.push(PricePoint {
                company: change.company,
                price: change.new_price,
                timestamp: now,
            });
            debug!(
                company = %change.company,
                old = %change.old_price,
                new = %change.new_price,
                base = %change.base_change,
                reversion = %change.mean_reversion,
                event = %change.event_impact,
                "price updated"
            );
        }
        changes
    })
}
