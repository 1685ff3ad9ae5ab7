//! Market data export — JSON and CSV artifact generation.
//!
//! Three exports: a full JSON dump of market state, plus two tabular CSVs —
//! the per-company price history tape and the per-user snapshot series.
//! Decimal columns are emitted as-is, so the 2 dp scale of stored prices
//! survives the round trip.

use anyhow::{Context, Result};
use ecomarket_core::domain::{Company, MarketEvent, PortfolioSnapshot, PricePoint};
use ecomarket_core::store::MarketStore;
use serde::Serialize;
use std::path::Path;

// ─── JSON export ────────────────────────────────────────────────────

/// Full market state as one serializable document.
#[derive(Debug, Serialize)]
pub struct MarketDump {
    pub companies: Vec<Company>,
    pub events: Vec<MarketEvent>,
    pub price_history: Vec<PricePoint>,
    pub snapshots: Vec<PortfolioSnapshot>,
}

/// Serialize the whole market to pretty JSON.
pub fn export_market_json(store: &MarketStore) -> Result<String> {
    let dump = MarketDump {
        companies: store.companies(),
        events: store.events(),
        price_history: store.full_price_history(),
        snapshots: store.all_snapshots(),
    };
    serde_json::to_string_pretty(&dump).context("failed to serialize market state to JSON")
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export the full price history as CSV.
///
/// Columns: company_id, company_name, price, timestamp
pub fn export_price_history_csv(store: &MarketStore) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["company_id", "company_name", "price", "timestamp"])?;

    for point in store.full_price_history() {
        let name = store
            .company(point.company)
            .map(|c| c.name)
            .unwrap_or_default();
        wtr.write_record([
            &point.company.to_string(),
            &name,
            &point.price.to_string(),
            &point.timestamp.to_rfc3339(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export every portfolio snapshot as CSV.
///
/// Columns: user, total_value, timestamp
pub fn export_snapshots_csv(store: &MarketStore) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["user", "total_value", "timestamp"])?;

    for snapshot in store.all_snapshots() {
        wtr.write_record([
            snapshot.user.as_str(),
            &snapshot.total_value.to_string(),
            &snapshot.timestamp.to_rfc3339(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write all exports into a directory: `market.json`, `price_history.csv`,
/// and `snapshots.csv`.
pub fn export_all(store: &MarketStore, dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create export directory {}", dir.display()))?;

    let json = export_market_json(store)?;
    std::fs::write(dir.join("market.json"), json).context("failed to write market.json")?;

    let history = export_price_history_csv(store)?;
    std::fs::write(dir.join("price_history.csv"), history)
        .context("failed to write price_history.csv")?;

    let snapshots = export_snapshots_csv(store)?;
    std::fs::write(dir.join("snapshots.csv"), snapshots)
        .context("failed to write snapshots.csv")?;

    Ok(())
}
