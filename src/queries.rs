use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, PriceUsd};
use crate::registry::{Loan, LoanRegistry, LoanRequest};
use crate::types::{AccountId, LoanId, LoanStatus};

/// read-only projections over the registry
pub struct QueryService<'a> {
    registry: &'a LoanRegistry,
}

/// serializable view of a loan request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestView {
    pub id: LoanId,
    pub borrower: AccountId,
    pub principal: Amount,
    pub collateral: Amount,
    pub duration_seconds: u64,
    pub interest_rate_bps: u32,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
}

impl RequestView {
    pub fn from_request(request: &LoanRequest) -> Self {
        RequestView {
            id: request.id,
            borrower: request.borrower.clone(),
            principal: request.principal,
            collateral: request.collateral,
            duration_seconds: request.duration_seconds,
            interest_rate_bps: request.interest_rate_bps,
            status: request.status(),
            created_at: request.created_at,
        }
    }
}

/// serializable view of a funded loan with derived status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower: AccountId,
    pub lender: AccountId,
    pub principal: Amount,
    pub collateral: Amount,
    pub interest_rate_bps: u32,
    pub start_timestamp: DateTime<Utc>,
    pub end_timestamp: DateTime<Utc>,
    pub initial_price_usd: PriceUsd,
    pub status: LoanStatus,
}

impl LoanView {
    pub fn from_loan(loan: &Loan, now: DateTime<Utc>) -> Self {
        LoanView {
            id: loan.id,
            borrower: loan.borrower.clone(),
            lender: loan.lender.clone(),
            principal: loan.principal,
            collateral: loan.collateral,
            interest_rate_bps: loan.interest_rate_bps,
            start_timestamp: loan.start_timestamp,
            end_timestamp: loan.end_timestamp,
            initial_price_usd: loan.initial_price_usd,
            status: loan.status(now),
        }
    }
}

/// what one account sees: the open request book plus its own positions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleView {
    pub account: AccountId,
    pub as_of: DateTime<Utc>,
    pub pending_requests: Vec<RequestView>,
    pub active_loans_as_borrower: Vec<LoanView>,
    pub active_loans_as_lender: Vec<LoanView>,
}

impl RoleView {
    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// full ledger snapshot with derived statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformView {
    pub as_of: DateTime<Utc>,
    pub requests: Vec<RequestView>,
    pub loans: Vec<LoanView>,
}

impl PlatformView {
    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl<'a> QueryService<'a> {
    pub fn new(registry: &'a LoanRegistry) -> Self {
        Self { registry }
    }

    /// open requests plus the account's unsettled loans on both sides
    ///
    /// the request book carries every open request; callers filter out the
    /// account's own when presenting fundable candidates.
    pub fn list_for_role(&self, account: &str, time_provider: &SafeTimeProvider) -> RoleView {
        let now = time_provider.now();
        let (requests, loans) = self.registry.list_all();

        let pending_requests = requests
            .iter()
            .filter(|r| r.is_active)
            .map(|r| RequestView::from_request(r))
            .collect();

        let active_loans_as_borrower = loans
            .iter()
            .filter(|l| !l.is_settled() && l.borrower == account)
            .map(|l| LoanView::from_loan(l, now))
            .collect();

        let active_loans_as_lender = loans
            .iter()
            .filter(|l| !l.is_settled() && l.lender == account)
            .map(|l| LoanView::from_loan(l, now))
            .collect();

        RoleView {
            account: account.to_string(),
            as_of: now,
            pending_requests,
            active_loans_as_borrower,
            active_loans_as_lender,
        }
    }

    /// every request and loan, settled ones included
    pub fn list_all(&self, time_provider: &SafeTimeProvider) -> PlatformView {
        let now = time_provider.now();
        let (requests, loans) = self.registry.list_all();

        PlatformView {
            as_of: now,
            requests: requests
                .iter()
                .map(|r| RequestView::from_request(r))
                .collect(),
            loans: loans.iter().map(|l| LoanView::from_loan(l, now)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformConfig;
    use chrono::{Duration, TimeZone};
    use hourglass_rs::TimeSource;

    fn test_clock() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    /// registry with an open request, a cancelled one, and a funded loan
    fn seeded(time: &SafeTimeProvider) -> LoanRegistry {
        let mut registry = LoanRegistry::new(PlatformConfig::standard());
        let now = time.now();

        registry
            .create_request(
                "alice",
                Amount::from_major(10),
                30 * 86_400,
                500,
                Amount::from_major(20),
                now,
            )
            .unwrap();
        registry
            .create_request(
                "carol",
                Amount::from_major(5),
                86_400,
                300,
                Amount::from_major(10),
                now,
            )
            .unwrap();
        registry
            .create_request(
                "dave",
                Amount::from_major(1),
                86_400,
                100,
                Amount::from_major(2),
                now,
            )
            .unwrap();

        registry
            .fund_request(2, "bob", PriceUsd::from_major(2_000), now)
            .unwrap();
        registry.cancel_request(3, "dave").unwrap();

        registry
    }

    #[test]
    fn test_role_view_splits_sides() {
        let time = test_clock();
        let registry = seeded(&time);
        let queries = QueryService::new(&registry);

        let bob = queries.list_for_role("bob", &time);
        assert_eq!(bob.pending_requests.len(), 1);
        assert_eq!(bob.pending_requests[0].borrower, "alice");
        assert!(bob.active_loans_as_borrower.is_empty());
        assert_eq!(bob.active_loans_as_lender.len(), 1);
        assert_eq!(bob.active_loans_as_lender[0].id, 2);

        let carol = queries.list_for_role("carol", &time);
        assert_eq!(carol.active_loans_as_borrower.len(), 1);
        assert!(carol.active_loans_as_lender.is_empty());
    }

    #[test]
    fn test_cancelled_requests_left_out_of_book() {
        let time = test_clock();
        let registry = seeded(&time);
        let queries = QueryService::new(&registry);

        let view = queries.list_for_role("bob", &time);
        assert!(view.pending_requests.iter().all(|r| r.borrower != "dave"));

        // the full snapshot still shows it, with its terminal status
        let all = queries.list_all(&time);
        assert_eq!(all.requests.len(), 2);
        assert_eq!(all.requests[1].status, LoanStatus::Cancelled);
    }

    #[test]
    fn test_settled_loans_drop_from_role_view() {
        let time = test_clock();
        let mut registry = seeded(&time);
        registry.mark_repaid(2).unwrap();

        let queries = QueryService::new(&registry);
        let carol = queries.list_for_role("carol", &time);
        let bob = queries.list_for_role("bob", &time);

        assert!(carol.active_loans_as_borrower.is_empty());
        assert!(bob.active_loans_as_lender.is_empty());

        let all = queries.list_all(&time);
        assert_eq!(all.loans[0].status, LoanStatus::Repaid);
    }

    #[test]
    fn test_expired_status_at_boundary() {
        let time = test_clock();
        let registry = seeded(&time);
        let control = time.test_control().unwrap();
        let queries = QueryService::new(&registry);

        control.advance(Duration::days(1) - Duration::seconds(1));
        let before = queries.list_all(&time);
        assert_eq!(before.loans[0].status, LoanStatus::Active);

        control.advance(Duration::seconds(1));
        let at_end = queries.list_all(&time);
        assert_eq!(at_end.loans[0].status, LoanStatus::Expired);
        assert_eq!(at_end.as_of, at_end.loans[0].end_timestamp);
    }

    #[test]
    fn test_views_serialize() {
        let time = test_clock();
        let registry = seeded(&time);
        let queries = QueryService::new(&registry);

        let json = queries.list_all(&time).to_json_pretty().unwrap();
        assert!(json.contains("\"initial_price_usd\": \"2000\""));
        assert!(json.contains("\"status\": \"Active\""));

        let role = queries.list_for_role("bob", &time).to_json_pretty().unwrap();
        assert!(role.contains("\"account\": \"bob\""));
    }
}
