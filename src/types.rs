use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Amount;

/// sequential identifier shared by requests and the loans funded from them
pub type LoanId = u64;

/// opaque account identifier (address, handle, or ledger key)
pub type AccountId = String;

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    /// request open, waiting for a lender
    Pending,
    /// request withdrawn by the borrower before funding
    Cancelled,
    /// funded and within its term
    Active,
    /// past its end timestamp, still unsettled
    Expired,
    /// settled by borrower repayment
    Repaid,
    /// settled by collateral seizure
    Liquidated,
}

/// direction of a transfer intent from the platform's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferDirection {
    /// funds collected from the account
    Debit,
    /// funds released to the account
    Credit,
}

/// instruction for a native-asset transfer; execution is the caller's concern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferIntent {
    pub direction: TransferDirection,
    pub account: AccountId,
    pub amount: Amount,
}

impl TransferIntent {
    /// collect from an account
    pub fn debit(account: impl Into<AccountId>, amount: Amount) -> Self {
        TransferIntent {
            direction: TransferDirection::Debit,
            account: account.into(),
            amount,
        }
    }

    /// release to an account
    pub fn credit(account: impl Into<AccountId>, amount: Amount) -> Self {
        TransferIntent {
            direction: TransferDirection::Credit,
            account: account.into(),
            amount,
        }
    }
}

/// what kind of settlement produced a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptKind {
    Repayment,
    Liquidation,
}

/// settlement receipt listing the transfers the caller must execute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub receipt_id: Uuid,
    pub loan_id: LoanId,
    pub kind: ReceiptKind,
    pub transfers: Vec<TransferIntent>,
    pub timestamp: DateTime<Utc>,
}
