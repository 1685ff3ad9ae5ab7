//! EcoMarket Core — the virtual sustainable-stock-market simulation.
//!
//! This crate contains the heart of the market simulation:
//! - Domain types (companies, market events, investment lots, transactions,
//!   price history, portfolio snapshots)
//! - In-memory relational store with single-lock transactional writes
//! - Simulation engine: event injector, price update engine, stock-reset
//!   watchdog, valuation snapshot job
//! - Portfolio ledger with FIFO lot accounting and flat sell tax
//! - Currency ledger boundary trait with an in-memory implementation
//! - Deterministic seed hierarchy for reproducible simulations

pub mod clock;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod rng;
pub mod seed;
pub mod store;

pub use error::{MarketError, Result};
