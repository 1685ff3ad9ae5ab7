//! Market configuration — every tunable the simulation reads.
//!
//! Defaults reproduce the production game balance. All fields are optional in
//! TOML; an empty file yields the defaults.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Simulation parameters shared by the pricing engine, the event injector,
/// the reset watchdog, and the portfolio ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Hard floor for any company price, enforced after every tick.
    pub price_floor: Decimal,

    /// Long-run price the mean-reversion term pulls toward.
    pub target_price: Decimal,

    /// Fraction of the relative deviation corrected per tick (0.01 = 1%).
    pub mean_reversion_strength: Decimal,

    /// Random-walk amplitude in basis points: base change is drawn uniformly
    /// in `[-noise_bps_max, +noise_bps_max]` (200 = ±2%, exact at 4 dp).
    pub noise_bps_max: i64,

    /// Event impact bounds in hundredths (-25 = -0.25, 35 = +0.35).
    pub event_impact_min_pct: i64,
    pub event_impact_max_pct: i64,

    /// Event lifetime bounds in minutes (inclusive).
    pub event_duration_min_minutes: u32,
    pub event_duration_max_minutes: u32,

    /// A price below this threshold starts the reset countdown.
    pub reset_threshold: Decimal,

    /// How long a price must stay below the threshold before liquidation.
    pub reset_window_minutes: i64,

    /// Price a liquidated company relaunches at.
    pub reset_price: Decimal,

    /// Flat tax withheld from every sell's gross proceeds.
    pub sell_tax_rate: Decimal,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            price_floor: dec!(1.00),
            target_price: dec!(100.00),
            mean_reversion_strength: dec!(0.01),
            noise_bps_max: 200,
            event_impact_min_pct: -25,
            event_impact_max_pct: 35,
            event_duration_min_minutes: 1,
            event_duration_max_minutes: 5,
            reset_threshold: dec!(1.50),
            reset_window_minutes: 2,
            reset_price: dec!(100.00),
            sell_tax_rate: dec!(0.18),
        }
    }
}

impl MarketConfig {
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        Self::from_toml_str(&text)
    }
}

/// Config loading errors, kept separate from `MarketError` — a bad config is
/// an operator problem, not a market-state problem.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(String, String),

    #[error("failed to parse config: {0}")]
    Parse(String),
}
