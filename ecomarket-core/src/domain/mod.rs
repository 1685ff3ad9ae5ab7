//! Domain types: companies, events, lots, transactions, snapshots, typed IDs.

mod company;
mod event;
mod ids;
mod investment;
mod snapshot;
mod transaction;

pub use company::{Company, CompanySpec, PricePoint};
pub use event::MarketEvent;
pub use ids::{CompanyId, EventId, LotId, TransactionId, UserId};
pub use investment::InvestmentLot;
pub use snapshot::PortfolioSnapshot;
pub use transaction::{Transaction, TransactionKind};
