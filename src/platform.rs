use hourglass_rs::SafeTimeProvider;
use uuid::Uuid;

use crate::config::PlatformConfig;
use crate::decimal::Amount;
use crate::errors::{LendingError, Result};
use crate::events::{Event, EventStore};
use crate::interest::{self, DueCalculation};
use crate::oracle::{PriceOracle, PriceQuote};
use crate::registry::{LoanRecord, LoanRegistry};
use crate::types::{AccountId, LoanId, Receipt, ReceiptKind, TransferIntent};

/// core platform struct driving the loan lifecycle
///
/// every operation validates, quotes if needed, then mutates; a failure
/// anywhere before the mutation leaves the ledger untouched. the platform
/// records transfer intents on receipts, it never moves assets itself.
pub struct LendingPlatform {
    registry: LoanRegistry,
    oracle: Box<dyn PriceOracle>,
    pub events: EventStore,
}

impl LendingPlatform {
    /// create platform with the given parameters and price source
    pub fn new(config: PlatformConfig, oracle: Box<dyn PriceOracle>) -> Self {
        Self {
            registry: LoanRegistry::new(config),
            oracle,
            events: EventStore::new(),
        }
    }

    pub fn config(&self) -> &PlatformConfig {
        self.registry.config()
    }

    /// read-only view of the ledger
    pub fn registry(&self) -> &LoanRegistry {
        &self.registry
    }

    /// swap the price source
    pub fn set_oracle(&mut self, oracle: Box<dyn PriceOracle>) {
        self.oracle = oracle;
    }

    /// open a loan request backed by posted collateral
    pub fn create_loan_request(
        &mut self,
        borrower: impl Into<AccountId>,
        principal: Amount,
        duration_seconds: u64,
        interest_rate_bps: u32,
        collateral: Amount,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanId> {
        let borrower = borrower.into();
        let now = time_provider.now();

        let id = self.registry.create_request(
            borrower.clone(),
            principal,
            duration_seconds,
            interest_rate_bps,
            collateral,
            now,
        )?;

        // emit event
        self.events.emit(Event::RequestCreated {
            id,
            borrower,
            principal,
            collateral,
            duration_seconds,
            interest_rate_bps,
            timestamp: now,
        });

        Ok(id)
    }

    /// fund an open request in full, anchoring the usd price
    pub fn fund_request(
        &mut self,
        request_id: LoanId,
        lender: impl Into<AccountId>,
        tendered: Amount,
        time_provider: &SafeTimeProvider,
    ) -> Result<LoanId> {
        let lender = lender.into();
        let now = time_provider.now();

        // validate against the open request before quoting
        let request = match self.registry.get(request_id) {
            Some(LoanRecord::Pending(request)) if request.is_active => request,
            Some(_) => return Err(LendingError::RequestInactive { id: request_id }),
            None => return Err(LendingError::RequestNotFound { id: request_id }),
        };
        if lender == request.borrower {
            return Err(LendingError::SelfFunding { id: request_id });
        }
        if tendered != request.principal {
            return Err(LendingError::PaymentMismatch {
                id: request_id,
                expected: request.principal,
                tendered,
            });
        }

        // capture the anchor price; a failed quote leaves the request open
        let quote = self.quote()?;

        let loan = self
            .registry
            .fund_request(request_id, lender, quote.price_usd, now)?;

        // emit event
        self.events.emit(Event::LoanFunded {
            id: loan.id,
            borrower: loan.borrower.clone(),
            lender: loan.lender.clone(),
            principal: loan.principal,
            initial_price_usd: loan.initial_price_usd,
            start_timestamp: loan.start_timestamp,
            end_timestamp: loan.end_timestamp,
        });

        Ok(loan.id)
    }

    /// settle a loan by paying the usd-pegged debt in native units
    ///
    /// stays available after expiry until a liquidation commits; interest
    /// keeps accruing to the moment of repayment. over-tender is forwarded
    /// to the lender untouched.
    pub fn repay(
        &mut self,
        loan_id: LoanId,
        tendered: Amount,
        time_provider: &SafeTimeProvider,
    ) -> Result<Receipt> {
        let now = time_provider.now();

        let loan = self.registry.loan(loan_id)?;
        if loan.is_settled() {
            return Err(LendingError::LoanNotActive { id: loan_id });
        }

        // quote first; a failed oracle aborts with no state change
        let quote = self.quote()?;

        let due = interest::amount_due(
            loan.principal,
            loan.interest_rate_bps,
            loan.initial_price_usd,
            quote.price_usd,
            loan.elapsed_seconds(now),
        );

        if tendered < due.amount_due {
            return Err(LendingError::PaymentMismatch {
                id: loan_id,
                expected: due.amount_due,
                tendered,
            });
        }

        let borrower = loan.borrower.clone();
        let lender = loan.lender.clone();
        let collateral = loan.collateral;

        self.registry.mark_repaid(loan_id)?;

        // emit event
        self.events.emit(Event::LoanRepaid {
            id: loan_id,
            borrower: borrower.clone(),
            lender: lender.clone(),
            amount_paid: tendered,
            amount_due: due.amount_due,
            total_due_usd: due.total_due_usd,
            price_usd: quote.price_usd,
            timestamp: now,
        });

        Ok(Receipt {
            receipt_id: Uuid::new_v4(),
            loan_id,
            kind: ReceiptKind::Repayment,
            transfers: vec![
                TransferIntent::debit(borrower.clone(), tendered),
                TransferIntent::credit(lender, tendered),
                TransferIntent::credit(borrower, collateral),
            ],
            timestamp: now,
        })
    }

    /// seize collateral on an expired loan; callable by anyone
    pub fn liquidate(
        &mut self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<Receipt> {
        let now = time_provider.now();

        let loan = self.registry.loan(loan_id)?;
        if loan.is_settled() {
            return Err(LendingError::AlreadySettled { id: loan_id });
        }
        if !loan.is_expired(now) {
            return Err(LendingError::NotYetExpired {
                id: loan_id,
                end_timestamp: loan.end_timestamp,
                now,
            });
        }

        let borrower = loan.borrower.clone();
        let lender = loan.lender.clone();
        let collateral = loan.collateral;

        self.registry.mark_liquidated(loan_id)?;

        // emit event
        self.events.emit(Event::LoanLiquidated {
            id: loan_id,
            borrower,
            lender: lender.clone(),
            collateral,
            timestamp: now,
        });

        Ok(Receipt {
            receipt_id: Uuid::new_v4(),
            loan_id,
            kind: ReceiptKind::Liquidation,
            transfers: vec![TransferIntent::credit(lender, collateral)],
            timestamp: now,
        })
    }

    /// withdraw an open request; only its borrower may cancel
    pub fn cancel_request(
        &mut self,
        request_id: LoanId,
        caller: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<()> {
        self.registry.cancel_request(request_id, caller)?;

        // emit event
        self.events.emit(Event::RequestCancelled {
            id: request_id,
            borrower: caller.to_string(),
            timestamp: time_provider.now(),
        });

        Ok(())
    }

    /// quote what would settle the loan right now
    pub fn amount_due(
        &self,
        loan_id: LoanId,
        time_provider: &SafeTimeProvider,
    ) -> Result<DueCalculation> {
        let loan = self.registry.loan(loan_id)?;
        if loan.is_settled() {
            return Err(LendingError::LoanNotActive { id: loan_id });
        }

        let quote = self.quote()?;

        Ok(interest::amount_due(
            loan.principal,
            loan.interest_rate_bps,
            loan.initial_price_usd,
            quote.price_usd,
            loan.elapsed_seconds(time_provider.now()),
        ))
    }

    /// get events
    pub fn take_events(&mut self) -> Vec<Event> {
        self.events.take_events()
    }

    /// obtain a quote and reject non-positive prices
    fn quote(&self) -> Result<PriceQuote> {
        let quote = self.oracle.quote()?;
        if !quote.price_usd.is_positive() {
            return Err(LendingError::OracleUnavailable {
                reason: format!("non-positive price quoted: {}", quote.price_usd),
            });
        }
        Ok(quote)
    }
}
