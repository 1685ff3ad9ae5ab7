//! The periodic simulation engine.
//!
//! One idempotent entry point per scheduled job:
//! - `inject_event` — manufacture a randomized market event
//! - `update_all_prices` — one price tick across every company
//! - `sweep_low_value_stocks` — reset chronically depressed prices and
//!   liquidate the positions held in them
//! - `record_snapshots` — persist one portfolio valuation per user
//!
//! The jobs are independent: they may run in any order and concurrently with
//! interactive trades, serializing on the store's write lock.

pub mod events;
pub mod pricing;
pub mod watchdog;

pub use events::EVENT_CATALOG;
pub use pricing::PriceChange;
pub use watchdog::{ResetRecord, SweepReport};

use crate::clock::Clock;
use crate::config::MarketConfig;
use crate::domain::EventId;
use crate::error::Result;
use crate::ledger::valuation;
use crate::rng::SeedHierarchy;
use crate::store::{CurrencyLedger, MarketStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared simulation engine. Cheap to clone via the `Arc`s inside.
pub struct MarketEngine {
    store: Arc<MarketStore>,
    currency: Arc<dyn CurrencyLedger>,
    config: MarketConfig,
    seeds: SeedHierarchy,
    clock: Arc<dyn Clock>,
    price_tick: AtomicU64,
    event_tick: AtomicU64,
}

impl MarketEngine {
    pub fn new(
        store: Arc<MarketStore>,
        currency: Arc<dyn CurrencyLedger>,
        config: MarketConfig,
        seeds: SeedHierarchy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            currency,
            config,
            seeds,
            clock,
            price_tick: AtomicU64::new(0),
            event_tick: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &Arc<MarketStore> {
        &self.store
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Recompute every company's price once. Returns the per-company changes.
    pub fn update_all_prices(&self) -> Vec<PriceChange> {
        let tick = self.price_tick.fetch_add(1, Ordering::Relaxed);
        pricing::update_all_prices(
            &self.store,
            &self.config,
            &self.seeds,
            self.clock.now(),
            tick,
        )
    }

    /// Create one randomized market event.
    pub fn inject_event(&self) -> Result<EventId> {
        let tick = self.event_tick.fetch_add(1, Ordering::Relaxed);
        events::inject_event(&self.store, &self.config, &self.seeds, self.clock.now(), tick)
    }

    /// Create `count` events in one pass.
    pub fn inject_events(&self, count: usize) -> Result<Vec<EventId>> {
        (0..count).map(|_| self.inject_event()).collect()
    }

    /// Evaluate every company against the reset condition.
    pub fn sweep_low_value_stocks(&self) -> SweepReport {
        watchdog::sweep_low_value_stocks(&self.store, &self.config, self.clock.now())
    }

    /// Persist one portfolio valuation snapshot per registered user.
    pub fn record_snapshots(&self) -> usize {
        valuation::record_snapshots(&self.store, self.currency.as_ref(), self.clock.now())
    }
}
