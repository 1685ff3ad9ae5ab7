//! Error taxonomy for the market core.

use crate::domain::{CompanyId, UserId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from market operations.
///
/// None of these are fatal to the process: trade rejections leave the store
/// and the currency ledger completely untouched, and the periodic jobs log
/// per-entity failures and move on.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("company {0} not found")]
    CompanyNotFound(CompanyId),

    #[error("user {0} is not registered")]
    UserNotFound(UserId),
}

pub type Result<T> = std::result::Result<T, MarketError>;
