use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;

use crate::decimal::PriceUsd;
use crate::errors::{LendingError, Result};

/// price observation for the native asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price_usd: PriceUsd,
    pub as_of: DateTime<Utc>,
}

/// source of usd price quotes for the native asset
pub trait PriceOracle {
    /// get the current quote; fails with OracleUnavailable when no price can be served
    fn quote(&self) -> Result<PriceQuote>;
}

/// oracle serving a settable fixed price, for tests and demos
pub struct FixedPriceOracle {
    quote: Rc<Cell<PriceQuote>>,
}

impl FixedPriceOracle {
    pub fn new(price: PriceUsd) -> Self {
        Self {
            quote: Rc::new(Cell::new(PriceQuote {
                price_usd: price,
                as_of: Utc::now(),
            })),
        }
    }

    /// handle for moving the price after the oracle has been boxed
    pub fn controller(&self) -> PriceController {
        PriceController {
            quote: Rc::clone(&self.quote),
        }
    }
}

impl PriceOracle for FixedPriceOracle {
    fn quote(&self) -> Result<PriceQuote> {
        Ok(self.quote.get())
    }
}

/// shared handle onto a FixedPriceOracle's price
pub struct PriceController {
    quote: Rc<Cell<PriceQuote>>,
}

impl PriceController {
    /// replace the quoted price, stamping the observation time
    pub fn set_price(&self, price: PriceUsd, as_of: DateTime<Utc>) {
        self.quote.set(PriceQuote {
            price_usd: price,
            as_of,
        });
    }

    /// currently quoted price
    pub fn price(&self) -> PriceUsd {
        self.quote.get().price_usd
    }
}

/// oracle that always fails, for exercising abort paths
pub struct UnavailableOracle;

impl PriceOracle for UnavailableOracle {
    fn quote(&self) -> Result<PriceQuote> {
        Err(LendingError::OracleUnavailable {
            reason: "no price source configured".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_oracle_serves_set_price() {
        let oracle = FixedPriceOracle::new(PriceUsd::from_major(2_000));
        let control = oracle.controller();

        let quote = oracle.quote().unwrap();
        assert_eq!(quote.price_usd, PriceUsd::from_major(2_000));

        let crash = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        control.set_price(PriceUsd::from_major(1_000), crash);

        let quote = oracle.quote().unwrap();
        assert_eq!(quote.price_usd, PriceUsd::from_major(1_000));
        assert_eq!(quote.as_of, crash);
        assert_eq!(control.price(), PriceUsd::from_major(1_000));
    }

    #[test]
    fn test_controller_reaches_boxed_oracle() {
        let oracle = FixedPriceOracle::new(PriceUsd::from_major(2_000));
        let control = oracle.controller();
        let boxed: Box<dyn PriceOracle> = Box::new(oracle);

        control.set_price(PriceUsd::from_major(3_000), Utc::now());
        assert_eq!(
            boxed.quote().unwrap().price_usd,
            PriceUsd::from_major(3_000)
        );
    }

    #[test]
    fn test_unavailable_oracle_fails() {
        let result = UnavailableOracle.quote();
        assert!(matches!(
            result,
            Err(LendingError::OracleUnavailable { .. })
        ));
    }
}
