//! End-to-end tests for the market simulation: trades, scheduled jobs, and
//! the interactions between them.
//!
//! Scenarios:
//! 1. Buy, crash, sell everything — balance and lots land exactly right
//! 2. Two buys at different prices, partial FIFO sell
//! 3. Watchdog liquidation driven by a manual clock
//! 4. A full simulated session: seed, tick, trade, snapshot

use chrono::{Duration, TimeZone, Utc};
use ecomarket_core::clock::{Clock, ManualClock};
use ecomarket_core::config::MarketConfig;
use ecomarket_core::domain::{CompanyId, TransactionKind, UserId};
use ecomarket_core::engine::MarketEngine;
use ecomarket_core::ledger::valuation::portfolio_value;
use ecomarket_core::ledger::PortfolioLedger;
use ecomarket_core::rng::SeedHierarchy;
use ecomarket_core::seed::seed_companies;
use ecomarket_core::store::{CurrencyLedger, InMemoryLedger, MarketStore};
use ecomarket_core::MarketError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

// ──────────────────────────────────────────────
// Helpers
// ──────────────────────────────────────────────

struct Sim {
    store: Arc<MarketStore>,
    currency: Arc<InMemoryLedger>,
    clock: Arc<ManualClock>,
    engine: MarketEngine,
    ledger: PortfolioLedger,
}

fn sim(seed: u64) -> Sim {
    let store = Arc::new(MarketStore::new());
    let currency = Arc::new(InMemoryLedger::new());
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
    ));
    let config = MarketConfig::default();
    let engine = MarketEngine::new(
        Arc::clone(&store),
        currency.clone() as Arc<dyn CurrencyLedger>,
        config.clone(),
        SeedHierarchy::new(seed),
        clock.clone() as Arc<dyn Clock>,
    );
    let ledger = PortfolioLedger::new(
        Arc::clone(&store),
        currency.clone() as Arc<dyn CurrencyLedger>,
        config,
        clock.clone() as Arc<dyn Clock>,
    );
    Sim {
        store,
        currency,
        clock,
        engine,
        ledger,
    }
}

fn one_company(sim: &Sim, price: Decimal) -> CompanyId {
    let ids = seed_companies(&sim.store, 1, sim.clock.now());
    let id = ids[0];
    sim.store.set_price(id, price);
    id
}

fn register(sim: &Sim, name: &str, balance: Decimal) -> UserId {
    let user = UserId::new(name);
    sim.currency.register(user.clone(), balance);
    user
}

// ──────────────────────────────────────────────
// Trade scenarios
// ──────────────────────────────────────────────

#[test]
fn buy_crash_sell_settles_exactly() {
    let s = sim(42);
    let company = one_company(&s, dec!(100.00));
    let ada = register(&s, "ada", dec!(1000.00));

    s.ledger.buy(&ada, company, 10).unwrap();
    assert_eq!(s.currency.balance(&ada), Some(dec!(0.00)));
    assert_eq!(portfolio_value(&s.store, &ada), dec!(1000.00));

    // Price halves, then the whole position is dumped.
    s.store.set_price(company, dec!(50.00));
    let txn = s.ledger.sell(&ada, company, 10).unwrap();

    // 10 × 50 = 500 gross, 18% tax withheld → 410 net.
    assert_eq!(txn.kind, TransactionKind::Sell);
    assert_eq!(txn.price_per_share, dec!(50.00));
    assert_eq!(txn.total, dec!(410.00));
    assert_eq!(s.currency.balance(&ada), Some(dec!(410.00)));
    assert!(s.store.lots_for_user(&ada).is_empty());
    assert_eq!(portfolio_value(&s.store, &ada), Decimal::ZERO);
}

#[test]
fn partial_sell_consumes_lots_oldest_first() {
    let s = sim(42);
    let company = one_company(&s, dec!(100.00));
    let ada = register(&s, "ada", dec!(2000.00));

    s.ledger.buy(&ada, company, 5).unwrap();
    s.store.set_price(company, dec!(110.00));
    s.ledger.buy(&ada, company, 5).unwrap();

    s.ledger.sell(&ada, company, 7).unwrap();

    let lots = s.store.lots_for_user(&ada);
    assert_eq!(lots.len(), 1);
    assert_eq!(lots[0].shares, 3);
    assert_eq!(lots[0].purchase_price, dec!(110.00));
}

#[test]
fn every_trade_appends_a_snapshot() {
    let s = sim(42);
    let company = one_company(&s, dec!(100.00));
    let ada = register(&s, "ada", dec!(2000.00));

    s.ledger.buy(&ada, company, 5).unwrap();
    s.ledger.sell(&ada, company, 2).unwrap();
    s.engine.record_snapshots();

    let snaps = s.store.snapshots_for(&ada);
    assert_eq!(snaps.len(), 3);
    assert_eq!(snaps[0].total_value, dec!(500.00));
    assert_eq!(snaps[1].total_value, dec!(300.00));
    assert_eq!(snaps[2].total_value, dec!(300.00));
}

#[test]
fn rejected_trades_leave_no_trace() {
    let s = sim(42);
    let company = one_company(&s, dec!(100.00));
    let ada = register(&s, "ada", dec!(50.00));

    assert!(matches!(
        s.ledger.buy(&ada, company, 10),
        Err(MarketError::InsufficientFunds { .. })
    ));
    assert!(matches!(
        s.ledger.sell(&ada, company, 1),
        Err(MarketError::InvalidRequest(_))
    ));
    assert!(s.store.transactions_for(&ada).is_empty());
    assert!(s.store.snapshots_for(&ada).is_empty());
    assert_eq!(s.currency.balance(&ada), Some(dec!(50.00)));
}

// ──────────────────────────────────────────────
// Watchdog with a manual clock
// ──────────────────────────────────────────────

#[test]
fn watchdog_liquidates_after_the_window_elapses() {
    let s = sim(42);
    let company = one_company(&s, dec!(100.00));
    let ada = register(&s, "ada", dec!(1000.00));
    s.ledger.buy(&ada, company, 5).unwrap();

    // Price collapses below the reset threshold.
    s.store.set_price(company, dec!(1.20));

    // First sweep starts the countdown, nothing is liquidated yet.
    let report = s.engine.sweep_low_value_stocks();
    assert!(report.resets.is_empty());
    assert_eq!(report.pending, 1);
    assert_eq!(s.store.holding(&ada, company), 5);

    // 90 seconds later: still inside the two-minute window.
    s.clock.advance(Duration::seconds(90));
    let report = s.engine.sweep_low_value_stocks();
    assert!(report.resets.is_empty());
    assert_eq!(report.pending, 1);

    // Past the window: position wiped, price reset, no payout.
    s.clock.advance(Duration::seconds(31));
    let report = s.engine.sweep_low_value_stocks();
    assert_eq!(report.resets.len(), 1);
    assert_eq!(report.resets[0].shares_removed, 5);
    assert_eq!(s.store.holding(&ada, company), 0);
    assert_eq!(s.store.company(company).unwrap().current_price, dec!(100.00));
    // The liquidation settles nothing.
    assert_eq!(s.currency.balance(&ada), Some(dec!(500.00)));
}

#[test]
fn recovery_inside_the_window_cancels_the_countdown() {
    let s = sim(42);
    let company = one_company(&s, dec!(1.20));
    let ada = register(&s, "ada", dec!(1000.00));
    s.ledger.buy(&ada, company, 5).unwrap();

    s.engine.sweep_low_value_stocks();
    s.clock.advance(Duration::seconds(60));

    // An admin price correction clears the countdown, like a tick would.
    s.store.set_price(company, dec!(80.00));

    s.clock.advance(Duration::minutes(5));
    let report = s.engine.sweep_low_value_stocks();
    assert!(report.resets.is_empty());
    assert_eq!(s.store.holding(&ada, company), 5);
}

// ──────────────────────────────────────────────
// Full session
// ──────────────────────────────────────────────

#[test]
fn full_session_runs_all_jobs_and_trades() {
    let s = sim(7);
    let ids = seed_companies(&s.store, 10, s.clock.now());
    let ada = register(&s, "ada", dec!(10000.00));
    let bob = register(&s, "bob", dec!(10000.00));

    s.ledger.buy(&ada, ids[0], 10).unwrap();
    s.ledger.buy(&bob, ids[1], 5).unwrap();

    for _ in 0..5 {
        s.engine.inject_event().unwrap();
        let changes = s.engine.update_all_prices();
        assert_eq!(changes.len(), 10);
        for change in &changes {
            assert!(change.new_price >= dec!(1.00));
        }
        s.engine.sweep_low_value_stocks();
        assert_eq!(s.engine.record_snapshots(), 2);
        s.clock.advance(Duration::minutes(1));
    }

    // 10 seed points + 10 companies × 5 ticks.
    assert_eq!(s.store.full_price_history().len(), 60);
    // One snapshot per trade plus one per snapshot job run.
    assert_eq!(s.store.snapshots_for(&ada).len(), 6);
    assert_eq!(s.store.snapshots_for(&bob).len(), 6);
    assert_eq!(s.store.events().len(), 5);

    // Selling out still works after the market has moved.
    let held = s.store.holding(&ada, ids[0]);
    let txn = s.ledger.sell(&ada, ids[0], held).unwrap();
    assert!(txn.total > Decimal::ZERO);
    assert_eq!(s.store.holding(&ada, ids[0]), 0);
}

#[test]
fn identical_seeds_replay_identical_markets() {
    let run = |seed| {
        let s = sim(seed);
        seed_companies(&s.store, 10, s.clock.now());
        for _ in 0..10 {
            s.engine.inject_event().unwrap();
            s.engine.update_all_prices();
        }
        s.store
            .companies()
            .into_iter()
            .map(|c| c.current_price)
            .collect::<Vec<_>>()
    };

    assert_eq!(run(99), run(99));
    assert_ne!(run(99), run(100));
}
