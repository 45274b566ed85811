//! Integer tax arithmetic in minor units.
//!
//! Quotients are formed in [`Decimal`] (exact base-10) and rounded back to
//! whole minor units with the profile's [`RoundingMode`]. No binary floating
//! point is ever involved.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use super::error::TaxError;
use super::types::RoundingMode;

/// One hundred percent in basis points.
pub const BPS_SCALE: Decimal = dec!(10000);

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Self::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            Self::HalfEven => RoundingStrategy::MidpointNearestEven,
        }
    }

    /// Round `value` to a whole minor unit.
    pub fn round(self, value: Decimal) -> Result<i64, TaxError> {
        value
            .round_dp_with_strategy(0, self.strategy())
            .to_i64()
            .ok_or_else(|| TaxError::Arithmetic(format!("{value} does not fit in minor units")))
    }
}

/// `round(amount × bps / 10000)`: tax added on top of a net amount.
pub fn exclusive_tax(amount: i64, rate_bps: u32, mode: RoundingMode) -> Result<i64, TaxError> {
    ratio(amount, Decimal::from(rate_bps), BPS_SCALE, mode)
}

/// `round(amount × bps / (10000 + bps))`: tax contained in a gross amount.
pub fn inclusive_tax(amount: i64, rate_bps: u32, mode: RoundingMode) -> Result<i64, TaxError> {
    let rate = Decimal::from(rate_bps);
    ratio(amount, rate, BPS_SCALE + rate, mode)
}

/// `round(amount × bps / 10000)` for percentage surcharges.
pub fn percent_of(amount: i64, percent_bps: u32, mode: RoundingMode) -> Result<i64, TaxError> {
    exclusive_tax(amount, percent_bps, mode)
}

/// Checked sum of minor-unit amounts.
pub fn sum_minor(values: impl IntoIterator<Item = i64>) -> Result<i64, TaxError> {
    values.into_iter().try_fold(0i64, |acc, v| {
        acc.checked_add(v)
            .ok_or_else(|| TaxError::Arithmetic("sum of amounts overflows".into()))
    })
}

fn ratio(
    amount: i64,
    numerator: Decimal,
    denominator: Decimal,
    mode: RoundingMode,
) -> Result<i64, TaxError> {
    if denominator.is_zero() {
        return Err(TaxError::Arithmetic("division by zero".into()));
    }
    let product = Decimal::from(amount)
        .checked_mul(numerator)
        .ok_or_else(|| TaxError::Arithmetic(format!("{amount} × {numerator} overflows")))?;
    let quotient = product
        .checked_div(denominator)
        .ok_or_else(|| TaxError::Arithmetic(format!("{product} / {denominator} overflows")))?;
    mode.round(quotient)
}
