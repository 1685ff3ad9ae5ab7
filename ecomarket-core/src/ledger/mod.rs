//! Portfolio ledger — settles trades and maintains lot-level holdings.
//!
//! Buys debit the currency ledger and open a new lot at the settlement
//! price; sells credit the net proceeds (after the flat tax) and consume
//! lots oldest-first. Every settled trade records exactly one transaction
//! row and appends one portfolio snapshot. Validation happens before any
//! mutation, and all mutations for one trade run inside a single store
//! write guard, so balance and lots can never diverge.
//!
//! Tax policy: the flat rate applies on every sell. (The original game had a
//! second, untaxed sell path; that inconsistency is resolved in favor of the
//! taxed one.)

pub mod valuation;

use crate::clock::Clock;
use crate::config::MarketConfig;
use crate::domain::{
    CompanyId, InvestmentLot, LotId, Transaction, TransactionKind, UserId,
};
use crate::error::{MarketError, Result};
use crate::store::{CurrencyLedger, MarketStore};
use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::Arc;
use tracing::info;

/// Trade settlement front-end over the store and the currency ledger.
pub struct PortfolioLedger {
    store: Arc<MarketStore>,
    currency: Arc<dyn CurrencyLedger>,
    config: MarketConfig,
    clock: Arc<dyn Clock>,
}

impl PortfolioLedger {
    pub fn new(
        store: Arc<MarketStore>,
        currency: Arc<dyn CurrencyLedger>,
        config: MarketConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            currency,
            config,
            clock,
        }
    }

    /// Buy `shares` of a company at its current price.
    ///
    /// Whole order or nothing: an order the balance cannot cover is rejected
    /// with `InsufficientFunds` and no partial fill.
    pub fn buy(&self, user: &UserId, company: CompanyId, shares: u32) -> Result<Transaction> {
        if shares == 0 {
            return Err(MarketError::InvalidRequest(
                "share count must be positive".into(),
            ));
        }
        let now = self.clock.now();

        self.store.write(|t| {
            let price = t
                .companies
                .get(&company)
                .ok_or(MarketError::CompanyNotFound(company))?
                .current_price;
            let total_cost = price * Decimal::from(shares);

            let reason = format!("buy {shares} shares of {company}");
            if !self.currency.debit(user, total_cost, &reason)? {
                let available = self.currency.balance(user).unwrap_or(Decimal::ZERO);
                return Err(MarketError::InsufficientFunds {
                    required: total_cost,
                    available,
                });
            }

            let lot_id = t.alloc_lot_id();
            t.lots.insert(
                lot_id,
                InvestmentLot {
                    id: lot_id,
                    user: user.clone(),
                    company,
                    shares,
                    purchase_price: price,
                    purchase_date: now,
                },
            );

            let txn = Transaction {
                id: t.alloc_transaction_id(),
                user: user.clone(),
                company,
                kind: TransactionKind::Buy,
                shares,
                price_per_share: price,
                total: total_cost,
                timestamp: now,
            };
            t.transactions.push(txn.clone());
            valuation::record_snapshot_for(t, user, now);

            info!(user = %user, company = %company, shares, price = %price, "buy settled");
            Ok(txn)
        })
    }

    /// Sell `shares` of a company at its current price, oldest lots first.
    ///
    /// Gross is `shares × current_price`; the flat tax is withheld and the
    /// net credited. Oversell is rejected with lots and balance untouched.
    pub fn sell(&self, user: &UserId, company: CompanyId, shares: u32) -> Result<Transaction> {
        if shares == 0 {
            return Err(MarketError::InvalidRequest(
                "share count must be positive".into(),
            ));
        }
        let now = self.clock.now();

        self.store.write(|t| {
            let price = t
                .companies
                .get(&company)
                .ok_or(MarketError::CompanyNotFound(company))?
                .current_price;

            let held: u32 = t.lots_for(user, company).iter().map(|l| l.shares).sum();
            if shares > held {
                return Err(MarketError::InvalidRequest(format!(
                    "cannot sell {shares} shares, only {held} held"
                )));
            }
            // Fail before mutating if the user is unregistered.
            self.currency
                .balance(user)
                .ok_or_else(|| MarketError::UserNotFound(user.clone()))?;

            let gross = price * Decimal::from(shares);
            let net = (gross * (Decimal::ONE - self.config.sell_tax_rate))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

            // FIFO: consume oldest lots first, deleting emptied ones.
            let fifo: Vec<LotId> = t
                .lots_for(user, company)
                .iter()
                .map(|lot| lot.id)
                .collect();
            let mut remaining = shares;
            for lot_id in fifo {
                if remaining == 0 {
                    break;
                }
                let Some(lot_shares) = t.lots.get(&lot_id).map(|lot| lot.shares) else {
                    continue;
                };
                if lot_shares <= remaining {
                    remaining -= lot_shares;
                    t.lots.remove(&lot_id);
                } else if let Some(lot) = t.lots.get_mut(&lot_id) {
                    lot.shares -= remaining;
                    remaining = 0;
                }
            }

            let reason = format!("sell {shares} shares of {company}");
            self.currency.credit(user, net, &reason)?;

            let txn = Transaction {
                id: t.alloc_transaction_id(),
                user: user.clone(),
                company,
                kind: TransactionKind::Sell,
                shares,
                price_per_share: price,
                total: net,
                timestamp: now,
            };
            t.transactions.push(txn.clone());
            valuation::record_snapshot_for(t, user, now);

            info!(user = %user, company = %company, shares, gross = %gross, net = %net, "sell settled");
            Ok(txn)
        })
    }
}
