use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, PriceUsd, UsdAmount};
use crate::types::{AccountId, LoanId};

/// all events that can be emitted by the platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // request events
    RequestCreated {
        id: LoanId,
        borrower: AccountId,
        principal: Amount,
        collateral: Amount,
        duration_seconds: u64,
        interest_rate_bps: u32,
        timestamp: DateTime<Utc>,
    },
    RequestCancelled {
        id: LoanId,
        borrower: AccountId,
        timestamp: DateTime<Utc>,
    },

    // funding events
    LoanFunded {
        id: LoanId,
        borrower: AccountId,
        lender: AccountId,
        principal: Amount,
        initial_price_usd: PriceUsd,
        start_timestamp: DateTime<Utc>,
        end_timestamp: DateTime<Utc>,
    },

    // settlement events
    LoanRepaid {
        id: LoanId,
        borrower: AccountId,
        lender: AccountId,
        amount_paid: Amount,
        amount_due: Amount,
        total_due_usd: UsdAmount,
        price_usd: PriceUsd,
        timestamp: DateTime<Utc>,
    },
    LoanLiquidated {
        id: LoanId,
        borrower: AccountId,
        lender: AccountId,
        collateral: Amount,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
