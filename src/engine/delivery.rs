//! Delivery fee as a synthetic taxed line.

use super::line::{LineTax, Pricing, tax_line};
use super::resolver::EffectiveProfile;
use crate::core::{DeliveryMode, OrderType, TaxError};

/// Line identifier of the synthetic delivery line in a breakdown.
pub const DELIVERY_LINE_ID: &str = "delivery";

/// Build the delivery line, if the policy folds the fee into the snapshot.
///
/// Only `as_line` policies on delivery orders with a non-zero fee produce a
/// line. A taxable fee is taxed by exactly the rate named by `taxCode`;
/// category, tag and order-type filters are not consulted.
pub fn delivery_line(
    profile: &EffectiveProfile,
    order_type: OrderType,
    fee: i64,
) -> Result<Option<LineTax>, TaxError> {
    let policy = &profile.delivery;
    if policy.mode != DeliveryMode::AsLine || order_type != OrderType::Delivery || fee == 0 {
        return Ok(None);
    }

    let rate = policy
        .tax_code
        .as_deref()
        .filter(|_| policy.taxable)
        .and_then(|code| profile.rate(code));
    let rates: Vec<_> = rate.into_iter().collect();

    let pricing = Pricing {
        inclusive: profile.prices_include_tax,
        rounding: profile.rounding,
    };

    tracing::debug!(fee, taxable = policy.taxable, "delivery fee folded in as a line");
    tax_line(DELIVERY_LINE_ID, fee, !policy.taxable, &rates, pricing).map(Some)
}
