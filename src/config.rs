use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::Amount;

/// platform-wide lending parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// collateral must be at least this multiple of principal
    pub min_collateral_ratio: Decimal,
    /// highest interest rate a request may carry, in basis points
    pub max_interest_rate_bps: u32,
}

impl PlatformConfig {
    /// create standard configuration: 2x collateral, 7% rate ceiling
    pub fn standard() -> Self {
        Self {
            min_collateral_ratio: dec!(2),
            max_interest_rate_bps: 700,
        }
    }

    /// collateral required for a given principal
    pub fn required_collateral(&self, principal: Amount) -> Amount {
        principal * self.min_collateral_ratio
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config() {
        let config = PlatformConfig::standard();
        assert_eq!(config.min_collateral_ratio, dec!(2));
        assert_eq!(config.max_interest_rate_bps, 700);
        assert_eq!(config, PlatformConfig::default());
    }

    #[test]
    fn test_required_collateral() {
        let config = PlatformConfig::standard();
        assert_eq!(
            config.required_collateral(Amount::from_major(10)),
            Amount::from_major(20)
        );
        assert_eq!(
            config.required_collateral(Amount::from_str_exact("2.5").unwrap()),
            Amount::from_major(5)
        );
    }
}
