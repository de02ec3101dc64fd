use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::PlatformConfig;
use crate::decimal::{Amount, PriceUsd};
use crate::errors::{LendingError, Result};
use crate::types::{AccountId, LoanId, LoanStatus};

/// open request waiting for a lender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRequest {
    pub id: LoanId,
    pub borrower: AccountId,
    pub principal: Amount,
    pub duration_seconds: u64,
    pub interest_rate_bps: u32,
    pub collateral: Amount,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl LoanRequest {
    /// open requests are pending, closed ones were cancelled
    pub fn status(&self) -> LoanStatus {
        if self.is_active {
            LoanStatus::Pending
        } else {
            LoanStatus::Cancelled
        }
    }
}

/// funded loan carrying its usd anchor price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub borrower: AccountId,
    pub lender: AccountId,
    pub principal: Amount,
    pub collateral: Amount,
    pub interest_rate_bps: u32,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
    pub initial_price_usd: PriceUsd,
    pub repaid: bool,
    pub liquidated: bool,
}

impl Loan {
    /// check if either terminal flag is set
    pub fn is_settled(&self) -> bool {
        self.repaid || self.liquidated
    }

    /// check if the term has run out; the end instant itself counts as expired
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.end_timestamp
    }

    /// whole seconds since funding, clamped at zero
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> u64 {
        (now - self.start_timestamp).num_seconds().max(0) as u64
    }

    /// derive lifecycle status from the terminal flags and the clock
    pub fn status(&self, now: DateTime<Utc>) -> LoanStatus {
        if self.repaid {
            LoanStatus::Repaid
        } else if self.liquidated {
            LoanStatus::Liquidated
        } else if self.is_expired(now) {
            LoanStatus::Expired
        } else {
            LoanStatus::Active
        }
    }
}

/// requests and loans share one id space; funding replaces the record in place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoanRecord {
    Pending(LoanRequest),
    Funded(Loan),
}

impl LoanRecord {
    pub fn id(&self) -> LoanId {
        match self {
            LoanRecord::Pending(request) => request.id,
            LoanRecord::Funded(loan) => loan.id,
        }
    }

    /// derive lifecycle status from stored flags and the clock
    pub fn status(&self, now: DateTime<Utc>) -> LoanStatus {
        match self {
            LoanRecord::Pending(request) => request.status(),
            LoanRecord::Funded(loan) => loan.status(now),
        }
    }
}

/// end instant of a term starting at `start`; rejects durations whose end
/// would leave the representable calendar
fn term_end(start: DateTime<Utc>, duration_seconds: u64) -> Result<DateTime<Utc>> {
    i64::try_from(duration_seconds)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .and_then(|term| start.checked_add_signed(term))
        .ok_or(LendingError::InvalidDuration {
            seconds: duration_seconds,
        })
}

/// canonical store of every request and loan, keyed by id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRegistry {
    config: PlatformConfig,
    records: BTreeMap<LoanId, LoanRecord>,
    next_id: LoanId,
}

impl LoanRegistry {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            records: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// validate and store a new request, assigning the next id
    pub fn create_request(
        &mut self,
        borrower: impl Into<AccountId>,
        principal: Amount,
        duration_seconds: u64,
        interest_rate_bps: u32,
        collateral: Amount,
        now: DateTime<Utc>,
    ) -> Result<LoanId> {
        // validate every term before touching the map
        if !principal.is_positive() {
            return Err(LendingError::InvalidAmount { amount: principal });
        }
        if duration_seconds == 0 {
            return Err(LendingError::InvalidDuration {
                seconds: duration_seconds,
            });
        }
        term_end(now, duration_seconds)?;
        if interest_rate_bps > self.config.max_interest_rate_bps {
            return Err(LendingError::InvalidRate {
                rate_bps: interest_rate_bps,
                max_bps: self.config.max_interest_rate_bps,
            });
        }
        let required = self.config.required_collateral(principal);
        if collateral < required {
            return Err(LendingError::InsufficientCollateral {
                posted: collateral,
                required,
            });
        }

        let id = self.next_id;
        self.next_id += 1;

        self.records.insert(
            id,
            LoanRecord::Pending(LoanRequest {
                id,
                borrower: borrower.into(),
                principal,
                duration_seconds,
                interest_rate_bps,
                collateral,
                is_active: true,
                created_at: now,
            }),
        );

        Ok(id)
    }

    /// convert an open request into a funded loan at the quoted price
    pub fn fund_request(
        &mut self,
        id: LoanId,
        lender: impl Into<AccountId>,
        price: PriceUsd,
        now: DateTime<Utc>,
    ) -> Result<Loan> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(LendingError::RequestNotFound { id })?;

        let request = match record {
            LoanRecord::Pending(request) if request.is_active => request,
            _ => return Err(LendingError::RequestInactive { id }),
        };

        let lender = lender.into();
        if lender == request.borrower {
            return Err(LendingError::SelfFunding { id });
        }

        // the term was bounded at creation, but the funding clock moved since
        let end_timestamp = term_end(now, request.duration_seconds)?;

        let loan = Loan {
            id,
            borrower: request.borrower.clone(),
            lender,
            principal: request.principal,
            collateral: request.collateral,
            interest_rate_bps: request.interest_rate_bps,
            start_timestamp: now,
            end_timestamp,
            initial_price_usd: price,
            repaid: false,
            liquidated: false,
        };

        *record = LoanRecord::Funded(loan.clone());
        Ok(loan)
    }

    /// withdraw an open request; only its borrower may cancel
    pub fn cancel_request(&mut self, id: LoanId, caller: &str) -> Result<()> {
        let record = self
            .records
            .get_mut(&id)
            .ok_or(LendingError::RequestNotFound { id })?;

        let request = match record {
            LoanRecord::Pending(request) if request.is_active => request,
            _ => return Err(LendingError::RequestInactive { id }),
        };

        if request.borrower != caller {
            return Err(LendingError::NotBorrower { id });
        }

        request.is_active = false;
        Ok(())
    }

    /// flag settlement by repayment; at most one terminal flag ever gets set
    pub fn mark_repaid(&mut self, id: LoanId) -> Result<()> {
        let loan = self.loan_mut(id)?;
        if loan.is_settled() {
            return Err(LendingError::AlreadySettled { id });
        }
        loan.repaid = true;
        Ok(())
    }

    /// flag settlement by collateral seizure
    pub fn mark_liquidated(&mut self, id: LoanId) -> Result<()> {
        let loan = self.loan_mut(id)?;
        if loan.is_settled() {
            return Err(LendingError::AlreadySettled { id });
        }
        loan.liquidated = true;
        Ok(())
    }

    pub fn get(&self, id: LoanId) -> Option<&LoanRecord> {
        self.records.get(&id)
    }

    /// typed accessor for a request not yet funded
    pub fn request(&self, id: LoanId) -> Result<&LoanRequest> {
        match self.records.get(&id) {
            Some(LoanRecord::Pending(request)) => Ok(request),
            _ => Err(LendingError::RequestNotFound { id }),
        }
    }

    /// typed accessor for a funded loan
    pub fn loan(&self, id: LoanId) -> Result<&Loan> {
        match self.records.get(&id) {
            Some(LoanRecord::Funded(loan)) => Ok(loan),
            _ => Err(LendingError::LoanNotFound { id }),
        }
    }

    fn loan_mut(&mut self, id: LoanId) -> Result<&mut Loan> {
        match self.records.get_mut(&id) {
            Some(LoanRecord::Funded(loan)) => Ok(loan),
            _ => Err(LendingError::LoanNotFound { id }),
        }
    }

    /// every request and loan, each list in id order
    pub fn list_all(&self) -> (Vec<&LoanRequest>, Vec<&Loan>) {
        let mut requests = Vec::new();
        let mut loans = Vec::new();

        for record in self.records.values() {
            match record {
                LoanRecord::Pending(request) => requests.push(request),
                LoanRecord::Funded(loan) => loans.push(loan),
            }
        }

        (requests, loans)
    }
}
