use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, PriceUsd, Rate, UsdAmount};

/// seconds in the fixed 365-day interest year
pub const SECONDS_PER_YEAR: u64 = 31_536_000;

/// breakdown of what settles a loan at a given moment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DueCalculation {
    pub principal_usd: UsdAmount,
    pub interest_usd: UsdAmount,
    pub total_due_usd: UsdAmount,
    pub amount_due: Amount,
    pub elapsed_seconds: u64,
}

/// compute the amount that settles a loan after `elapsed_seconds`
///
/// interest is simple, pegged to the usd value of the principal at the
/// funding-time price; the usd debt converts back to native units at the
/// current price. prices must be positive, callers validate quotes first.
pub fn amount_due(
    principal: Amount,
    rate_bps: u32,
    initial_price: PriceUsd,
    current_price: PriceUsd,
    elapsed_seconds: u64,
) -> DueCalculation {
    let principal_usd = principal * initial_price;
    let rate = Rate::from_bps(rate_bps);
    let year_fraction = Decimal::from(elapsed_seconds) / Decimal::from(SECONDS_PER_YEAR);

    let interest_usd = principal_usd * (rate.as_decimal() * year_fraction);
    let total_due_usd = principal_usd + interest_usd;
    let amount_due = total_due_usd / current_price;

    DueCalculation {
        principal_usd,
        interest_usd,
        total_due_usd,
        amount_due,
        elapsed_seconds,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_full_year_at_five_percent() {
        let due = amount_due(
            Amount::from_major(10),
            500,
            PriceUsd::from_major(2_000),
            PriceUsd::from_major(2_000),
            SECONDS_PER_YEAR,
        );

        assert_eq!(due.principal_usd, UsdAmount::from_major(20_000));
        assert_eq!(due.interest_usd, UsdAmount::from_major(1_000));
        assert_eq!(due.total_due_usd, UsdAmount::from_major(21_000));
        assert_eq!(due.amount_due, Amount::from_str_exact("10.5").unwrap());
    }

    #[test]
    fn test_price_drop_raises_native_due() {
        // same usd debt, half the price: twice the native units
        let due = amount_due(
            Amount::from_major(10),
            500,
            PriceUsd::from_major(2_000),
            PriceUsd::from_major(1_000),
            SECONDS_PER_YEAR,
        );

        assert_eq!(due.total_due_usd, UsdAmount::from_major(21_000));
        assert_eq!(due.amount_due, Amount::from_major(21));
    }

    #[test]
    fn test_price_rise_lowers_native_due() {
        let due = amount_due(
            Amount::from_major(10),
            500,
            PriceUsd::from_major(2_000),
            PriceUsd::from_major(2_050),
            SECONDS_PER_YEAR / 2,
        );

        assert_eq!(due.interest_usd, UsdAmount::from_major(500));
        assert_eq!(due.total_due_usd, UsdAmount::from_major(20_500));
        assert_eq!(due.amount_due, Amount::from_major(10));
    }

    #[test]
    fn test_usd_debt_independent_of_current_price() {
        let at_price = |price| {
            amount_due(
                Amount::from_major(10),
                500,
                PriceUsd::from_major(2_000),
                PriceUsd::from_major(price),
                86_400,
            )
        };

        let low = at_price(500);
        let high = at_price(4_000);

        assert_eq!(low.total_due_usd, high.total_due_usd);
        assert!(low.amount_due > high.amount_due);
    }

    #[test]
    fn test_zero_elapsed_charges_no_interest() {
        let due = amount_due(
            Amount::from_major(10),
            500,
            PriceUsd::from_major(2_000),
            PriceUsd::from_major(2_000),
            0,
        );

        assert_eq!(due.interest_usd, UsdAmount::ZERO);
        assert_eq!(due.amount_due, Amount::from_major(10));
    }

    #[test]
    fn test_zero_rate_charges_no_interest() {
        let due = amount_due(
            Amount::from_major(10),
            0,
            PriceUsd::from_major(2_000),
            PriceUsd::from_major(2_000),
            SECONDS_PER_YEAR,
        );

        assert_eq!(due.interest_usd, UsdAmount::ZERO);
        assert_eq!(due.total_due_usd, due.principal_usd);
    }

    #[test]
    fn test_thirty_day_interest() {
        // 5 eth at 3000 usd, 7% for 30 days: 15000 * 0.07 * 30/365
        let due = amount_due(
            Amount::from_major(5),
            700,
            PriceUsd::from_major(3_000),
            PriceUsd::from_major(3_000),
            30 * 86_400,
        );

        assert_eq!(
            due.interest_usd.round_dp(2),
            UsdAmount::from_decimal(dec!(86.30))
        );
    }

    #[test]
    fn test_due_monotone_in_elapsed() {
        let mut last = Amount::ZERO;

        for elapsed in [0, 1, 60, 3_600, 86_400, SECONDS_PER_YEAR, 2 * SECONDS_PER_YEAR] {
            let due = amount_due(
                Amount::from_major(10),
                500,
                PriceUsd::from_major(2_000),
                PriceUsd::from_major(2_000),
                elapsed,
            );
            assert!(due.amount_due >= last);
            last = due.amount_due;
        }
    }
}
