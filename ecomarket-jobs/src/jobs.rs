//! The four recurring market jobs, wrapped as schedulable units.
//!
//! Each job borrows the shared engine and translates one engine entry point
//! into the `Job` interface. Outcome summaries are logged at info so a
//! running session leaves a readable trace.

use crate::scheduler::Job;
use anyhow::Result;
use ecomarket_core::engine::MarketEngine;
use std::sync::Arc;
use tracing::info;

/// Recomputes every company's price once per run.
pub struct PriceTickJob {
    engine: Arc<MarketEngine>,
}

impl PriceTickJob {
    pub fn new(engine: Arc<MarketEngine>) -> Self {
        Self { engine }
    }
}

impl Job for PriceTickJob {
    fn name(&self) -> &str {
        "price-tick"
    }

    fn run(&self) -> Result<()> {
        let changes = self.engine.update_all_prices();
        info!(companies = changes.len(), "price tick complete");
        Ok(())
    }
}

/// Injects one randomized market event per run.
pub struct EventInjectionJob {
    engine: Arc<MarketEngine>,
}

impl EventInjectionJob {
    pub fn new(engine: Arc<MarketEngine>) -> Self {
        Self { engine }
    }
}

impl Job for EventInjectionJob {
    fn name(&self) -> &str {
        "event-injection"
    }

    fn run(&self) -> Result<()> {
        let id = self.engine.inject_event()?;
        info!(event = %id, "market event injected");
        Ok(())
    }
}

/// Resets chronically depressed stocks and liquidates positions in them.
pub struct WatchdogJob {
    engine: Arc<MarketEngine>,
}

impl WatchdogJob {
    pub fn new(engine: Arc<MarketEngine>) -> Self {
        Self { engine }
    }
}

impl Job for WatchdogJob {
    fn name(&self) -> &str {
        "low-value-watchdog"
    }

    fn run(&self) -> Result<()> {
        let report = self.engine.sweep_low_value_stocks();
        if !report.resets.is_empty() || report.pending > 0 {
            info!(
                resets = report.resets.len(),
                pending = report.pending,
                "watchdog sweep complete"
            );
        }
        Ok(())
    }
}

/// Records one portfolio valuation snapshot per registered user.
pub struct SnapshotJob {
    engine: Arc<MarketEngine>,
}

impl SnapshotJob {
    pub fn new(engine: Arc<MarketEngine>) -> Self {
        Self { engine }
    }
}

impl Job for SnapshotJob {
    fn name(&self) -> &str {
        "portfolio-snapshots"
    }

    fn run(&self) -> Result<()> {
        let written = self.engine.record_snapshots();
        info!(snapshots = written, "portfolio snapshots recorded");
        Ok(())
    }
}
