//! In-memory relational store for the market core.
//!
//! Six logical tables: companies, market events, investment lots,
//! transactions, price history, and portfolio snapshots. Events,
//! transactions, history, and snapshots are append-only; companies are
//! mutated in place every tick; lots are decremented or deleted by sells and
//! liquidations.
//!
//! Every mutating operation runs inside a single `write` guard, which is the
//! atomicity unit: a buy's debit, lot insert, transaction row, and snapshot
//! all commit together or not at all. Concurrent writers (interactive trades
//! racing the scheduled jobs) serialize on the lock, so there is no lost
//! update between a reset and a price tick touching the same company.

mod ledger;

pub use ledger::{CurrencyLedger, InMemoryLedger, LedgerEntry, LedgerSide};

use crate::domain::{
    Company, CompanyId, CompanySpec, EventId, InvestmentLot, LotId, MarketEvent,
    PortfolioSnapshot, PricePoint, Transaction, TransactionId, UserId,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// The tables, visible to the engine and portfolio ledger within the crate.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub companies: BTreeMap<CompanyId, Company>,
    pub events: Vec<MarketEvent>,
    /// Keyed by `LotId`; BTreeMap iteration order is allocation order,
    /// which is purchase order, which is FIFO order.
    pub lots: BTreeMap<LotId, InvestmentLot>,
    pub transactions: Vec<Transaction>,
    pub price_history: Vec<PricePoint>,
    pub snapshots: Vec<PortfolioSnapshot>,
    next_company_id: u64,
    next_event_id: u64,
    next_lot_id: u64,
    next_transaction_id: u64,
}

impl Tables {
    pub fn alloc_company_id(&mut self) -> CompanyId {
        self.next_company_id += 1;
        CompanyId(self.next_company_id)
    }

    pub fn alloc_event_id(&mut self) -> EventId {
        self.next_event_id += 1;
        EventId(self.next_event_id)
    }

    pub fn alloc_lot_id(&mut self) -> LotId {
        self.next_lot_id += 1;
        LotId(self.next_lot_id)
    }

    pub fn alloc_transaction_id(&mut self) -> TransactionId {
        self.next_transaction_id += 1;
        TransactionId(self.next_transaction_id)
    }

    /// Events currently influencing the given company.
    pub fn active_events_for(&self, company: CompanyId, now: DateTime<Utc>) -> Vec<&MarketEvent> {
        self.events
            .iter()
            .filter(|e| e.is_active(now) && e.affects(company))
            .collect()
    }

    /// A user's lots for one company, oldest first.
    pub fn lots_for(&self, user: &UserId, company: CompanyId) -> Vec<&InvestmentLot> {
        self.lots
            .values()
            .filter(|lot| &lot.user == user && lot.company == company)
            .collect()
    }
}

/// Thread-safe store handle. Cheap to share via `&MarketStore` or `Arc`.
#[derive(Debug, Default)]
pub struct MarketStore {
    inner: RwLock<Tables>,
}

impl MarketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Tables) -> R) -> R {
        f(&self.inner.read())
    }

    pub(crate) fn write<R>(&self, f: impl FnOnce(&mut Tables) -> R) -> R {
        f(&mut self.inner.write())
    }

    // ── Seeding ────────────────────────────────────────────────────────

    /// Insert a company, assigning its ID. Companies are created at seed time
    /// and never deleted — a "failed" company is reset, not delisted.
    pub fn insert_company(&self, spec: CompanySpec) -> CompanyId {
        self.write(|t| {
            let id = t.alloc_company_id();
            t.companies.insert(id, Company::from_spec(id, spec));
            id
        })
    }

    /// Overwrite a company's price directly, as an admin correction would.
    /// Clears the low-price countdown; the next tick or sweep re-evaluates
    /// it against the fresh price. Returns false for an unknown company.
    pub fn set_price(&self, id: CompanyId, price: Decimal) -> bool {
        self.write(|t| match t.companies.get_mut(&id) {
            Some(company) => {
                company.current_price = price;
                company.price_low_since = None;
                true
            }
            None => false,
        })
    }

    // ── Read API (company registry) ────────────────────────────────────

    pub fn company(&self, id: CompanyId) -> Option<Company> {
        self.read(|t| t.companies.get(&id).cloned())
    }

    pub fn companies(&self) -> Vec<Company> {
        self.read(|t| t.companies.values().cloned().collect())
    }

    pub fn company_count(&self) -> usize {
        self.read(|t| t.companies.len())
    }

    // ── Read API (events) ──────────────────────────────────────────────

    pub fn events(&self) -> Vec<MarketEvent> {
        self.read(|t| t.events.clone())
    }

    pub fn active_events(&self, now: DateTime<Utc>) -> Vec<MarketEvent> {
        self.read(|t| {
            t.events
                .iter()
                .filter(|e| e.is_active(now))
                .cloned()
                .collect()
        })
    }

    // ── Read API (portfolio) ───────────────────────────────────────────

    /// All of a user's lots across companies, oldest first.
    pub fn lots_for_user(&self, user: &UserId) -> Vec<InvestmentLot> {
        self.read(|t| {
            t.lots
                .values()
                .filter(|lot| &lot.user == user)
                .cloned()
                .collect()
        })
    }

    /// A user's aggregate share count in one company.
    pub fn holding(&self, user: &UserId, company: CompanyId) -> u32 {
        self.read(|t| t.lots_for(user, company).iter().map(|l| l.shares).sum())
    }

    pub fn transactions_for(&self, user: &UserId) -> Vec<Transaction> {
        self.read(|t| {
            t.transactions
                .iter()
                .filter(|txn| &txn.user == user)
                .cloned()
                .collect()
        })
    }

    pub fn snapshots_for(&self, user: &UserId) -> Vec<PortfolioSnapshot> {
        self.read(|t| {
            t.snapshots
                .iter()
                .filter(|s| &s.user == user)
                .cloned()
                .collect()
        })
    }

    // ── Read API (history) ─────────────────────────────────────────────

    pub fn price_history(&self, company: CompanyId) -> Vec<PricePoint> {
        self.read(|t| {
            t.price_history
                .iter()
                .filter(|p| p.company == company)
                .cloned()
                .collect()
        })
    }

    pub fn full_price_history(&self) -> Vec<PricePoint> {
        self.read(|t| t.price_history.clone())
    }

    pub fn all_snapshots(&self) -> Vec<PortfolioSnapshot> {
        self.read(|t| t.snapshots.clone())
    }
}
