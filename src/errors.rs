use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::decimal::Amount;
use crate::types::LoanId;

#[derive(Error, Debug)]
pub enum LendingError {
    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Amount,
    },

    #[error("invalid duration: {seconds} seconds")]
    InvalidDuration {
        seconds: u64,
    },

    #[error("invalid interest rate: {rate_bps} bps exceeds maximum {max_bps} bps")]
    InvalidRate {
        rate_bps: u32,
        max_bps: u32,
    },

    #[error("insufficient collateral: posted {posted}, required {required}")]
    InsufficientCollateral {
        posted: Amount,
        required: Amount,
    },

    #[error("request not found: {id}")]
    RequestNotFound {
        id: LoanId,
    },

    #[error("request not open for funding: {id}")]
    RequestInactive {
        id: LoanId,
    },

    #[error("borrower cannot fund own request: {id}")]
    SelfFunding {
        id: LoanId,
    },

    #[error("caller is not the borrower of request {id}")]
    NotBorrower {
        id: LoanId,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("loan not active: {id}")]
    LoanNotActive {
        id: LoanId,
    },

    #[error("loan already settled: {id}")]
    AlreadySettled {
        id: LoanId,
    },

    #[error("loan {id} not yet expired: ends {end_timestamp}, current time {now}")]
    NotYetExpired {
        id: LoanId,
        end_timestamp: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("price oracle unavailable: {reason}")]
    OracleUnavailable {
        reason: String,
    },

    #[error("payment mismatch for loan {id}: expected {expected}, tendered {tendered}")]
    PaymentMismatch {
        id: LoanId,
        expected: Amount,
        tendered: Amount,
    },
}

pub type Result<T> = std::result::Result<T, LendingError>;
