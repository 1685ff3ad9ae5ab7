//! EcoMarket Jobs — scheduled-job orchestration and data export.
//!
//! This crate builds on `ecomarket-core` to provide:
//! - The four recurring market jobs (event injection, price ticks, the
//!   low-value-stock watchdog, portfolio snapshots) as schedulable units
//! - A fixed-interval scheduler driven by the core clock abstraction
//! - CSV export of price history and snapshot series

pub mod config;
pub mod export;
pub mod jobs;
pub mod scheduler;

pub use config::JobsConfig;
pub use jobs::{EventInjectionJob, PriceTickJob, SnapshotJob, WatchdogJob};
pub use scheduler::{Job, Scheduler};
