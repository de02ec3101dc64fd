use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};
use std::str::FromStr;

/// native-asset amount with 18 decimal places for wei-level accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);
    pub const ONE: Amount = Amount(Decimal::ONE);
    pub const WEI: Amount = Amount(Decimal::from_parts(1, 0, 0, false, 18));

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Amount(d.round_dp(18))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Amount(Decimal::from_str(s)?.round_dp(18)))
    }

    /// create from whole native units
    pub fn from_major(amount: i64) -> Self {
        Amount(Decimal::from(amount))
    }

    /// create from base units (wei); panics if the value exceeds decimal range
    pub fn from_wei(wei: i128) -> Self {
        Amount(Decimal::from_i128_with_scale(wei, 18))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        Amount(self.0.round_dp(dp))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// minimum of two values
    pub fn min(self, other: Self) -> Self {
        Amount(self.0.min(other.0))
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Amount(self.0.max(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::from_str_exact(s)
    }
}

impl From<Decimal> for Amount {
    fn from(d: Decimal) -> Self {
        Amount::from_decimal(d)
    }
}

impl From<i32> for Amount {
    fn from(i: i32) -> Self {
        Amount::from_major(i as i64)
    }
}

impl From<u32> for Amount {
    fn from(i: u32) -> Self {
        Amount::from_major(i as i64)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount((self.0 + other.0).round_dp(18))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Amount) {
        self.0 = (self.0 + other.0).round_dp(18);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, other: Amount) -> Amount {
        Amount((self.0 - other.0).round_dp(18))
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Amount) {
        self.0 = (self.0 - other.0).round_dp(18);
    }
}

impl Mul<Decimal> for Amount {
    type Output = Amount;

    fn mul(self, other: Decimal) -> Amount {
        Amount((self.0 * other).round_dp(18))
    }
}

impl Div<Decimal> for Amount {
    type Output = Amount;

    fn div(self, other: Decimal) -> Amount {
        Amount((self.0 / other).round_dp(18))
    }
}

/// value a native amount in usd at the given price
impl Mul<PriceUsd> for Amount {
    type Output = UsdAmount;

    fn mul(self, price: PriceUsd) -> UsdAmount {
        UsdAmount::from_decimal(self.0 * price.0)
    }
}

/// usd-denominated value with 8 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct UsdAmount(Decimal);

impl UsdAmount {
    pub const ZERO: UsdAmount = UsdAmount(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        UsdAmount(d.round_dp(8))
    }

    /// create from whole dollars
    pub fn from_major(amount: i64) -> Self {
        UsdAmount(Decimal::from(amount))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// round to specified decimal places
    pub fn round_dp(&self, dp: u32) -> Self {
        UsdAmount(self.0.round_dp(dp))
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for UsdAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for UsdAmount {
    type Output = UsdAmount;

    fn add(self, other: UsdAmount) -> UsdAmount {
        UsdAmount((self.0 + other.0).round_dp(8))
    }
}

impl Sub for UsdAmount {
    type Output = UsdAmount;

    fn sub(self, other: UsdAmount) -> UsdAmount {
        UsdAmount((self.0 - other.0).round_dp(8))
    }
}

impl Mul<Decimal> for UsdAmount {
    type Output = UsdAmount;

    fn mul(self, other: Decimal) -> UsdAmount {
        UsdAmount((self.0 * other).round_dp(8))
    }
}

impl Div<Decimal> for UsdAmount {
    type Output = UsdAmount;

    fn div(self, other: Decimal) -> UsdAmount {
        UsdAmount((self.0 / other).round_dp(8))
    }
}

/// convert a usd value back to native units at the given price
impl Div<PriceUsd> for UsdAmount {
    type Output = Amount;

    fn div(self, price: PriceUsd) -> Amount {
        Amount::from_decimal(self.0 / price.0)
    }
}

/// usd price of one native unit, 8 decimal places
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct PriceUsd(Decimal);

impl PriceUsd {
    pub const ZERO: PriceUsd = PriceUsd(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        PriceUsd(d.round_dp(8))
    }

    /// create from whole dollars per native unit
    pub fn from_major(price: i64) -> Self {
        PriceUsd(Decimal::from(price))
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if strictly positive
    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }
}

impl fmt::Display for PriceUsd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Decimal> for PriceUsd {
    fn from(d: Decimal) -> Self {
        PriceUsd::from_decimal(d)
    }
}

/// rate type for interest rates and ratios
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(Decimal::ZERO);
    pub const ONE: Rate = Rate(Decimal::ONE);

    /// create from decimal (e.g., 0.05 for 5%)
    pub fn from_decimal(d: Decimal) -> Self {
        Rate(d)
    }

    /// create from percentage (e.g., 5 for 5%)
    pub fn from_percentage(p: u32) -> Self {
        Rate(Decimal::from(p) / Decimal::from(100))
    }

    /// create from basis points (e.g., 500 for 5%)
    pub fn from_bps(bps: u32) -> Self {
        Rate(Decimal::from(bps) / Decimal::from(10000))
    }

    /// get as decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// get as percentage
    pub fn as_percentage(&self) -> Decimal {
        self.0 * Decimal::from(100)
    }

    /// get as basis points
    pub fn as_bps(&self) -> Decimal {
        self.0 * Decimal::from(10000)
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percentage())
    }
}

impl From<Decimal> for Rate {
    fn from(d: Decimal) -> Self {
        Rate::from_decimal(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_precision() {
        let a = Amount::from_str_exact("1.1234567890123456789").unwrap();
        assert_eq!(a.to_string(), "1.123456789012345679"); // rounded to 18 places
    }

    #[test]
    fn test_wei_precision() {
        let eth = Amount::from_wei(1_000_000_000_000_000_000); // 1 ETH in wei
        assert_eq!(eth, Amount::from_major(1));

        let wei = Amount::from_wei(1);
        assert_eq!(wei, Amount::WEI);
    }

    #[test]
    fn test_usd_conversion_round_trip() {
        let principal = Amount::from_major(10);
        let price = PriceUsd::from_major(2_000);

        let usd = principal * price;
        assert_eq!(usd, UsdAmount::from_major(20_000));

        let native = usd / price;
        assert_eq!(native, principal);
    }

    #[test]
    fn test_usd_conversion_at_lower_price() {
        let debt = UsdAmount::from_major(21_000);
        let price = PriceUsd::from_major(1_000);

        assert_eq!(debt / price, Amount::from_major(21));
    }

    #[test]
    fn test_usd_rounding() {
        let usd = UsdAmount::from_decimal(dec!(0.123456789));
        assert_eq!(usd.to_string(), "0.12345679"); // rounded to 8 places
    }

    #[test]
    fn test_rate_conversions() {
        let rate = Rate::from_bps(500);
        assert_eq!(rate.as_decimal(), dec!(0.05));
        assert_eq!(rate.as_percentage(), dec!(5));
        assert_eq!(rate.as_bps(), dec!(500));
        assert_eq!(rate, Rate::from_percentage(5));
    }

    #[test]
    fn test_amount_arithmetic() {
        let a = Amount::from_major(3);
        let b = Amount::from_str_exact("0.5").unwrap();

        assert_eq!(a + b, Amount::from_str_exact("3.5").unwrap());
        assert_eq!(a - b, Amount::from_str_exact("2.5").unwrap());
        assert_eq!(a * dec!(2), Amount::from_major(6));
        assert_eq!(a.max(b), a);
    }
}
