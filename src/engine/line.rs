//! Per-line tax computation.

use serde::Serialize;

use crate::core::{RoundingMode, TaxError, TaxRateRule, exclusive_tax, inclusive_tax, sum_minor};

/// Pricing semantics shared by lines and surcharges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    /// Amounts already contain tax.
    pub inclusive: bool,
    pub rounding: RoundingMode,
}

impl Pricing {
    /// Tax on `amount` at `rate_bps`: extracted when inclusive, added otherwise.
    pub fn tax_on(&self, amount: i64, rate_bps: u32) -> Result<i64, TaxError> {
        if self.inclusive {
            inclusive_tax(amount, rate_bps, self.rounding)
        } else {
            exclusive_tax(amount, rate_bps, self.rounding)
        }
    }
}

/// Tax charged under one rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedTax {
    pub code: String,
    pub rate_bps: u32,
    pub tax: i64,
}

/// Computed result for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineTax {
    pub line_id: String,
    pub gross: i64,
    /// Net amount: gross minus extracted tax under inclusive pricing.
    pub base: i64,
    pub exempt: bool,
    /// One entry per matched rate, in rate declaration order.
    pub taxes: Vec<AppliedTax>,
}

impl LineTax {
    /// Total tax of the line across all rates.
    pub fn tax(&self) -> i64 {
        self.taxes.iter().map(|t| t.tax).sum()
    }
}

/// Compute base and tax for one line of `gross` minor units.
///
/// Every matched rate is applied independently to the same gross; rates
/// never compound. Exempt lines carry `base == gross` and no taxes.
pub fn tax_line(
    line_id: &str,
    gross: i64,
    exempt: bool,
    rates: &[&TaxRateRule],
    pricing: Pricing,
) -> Result<LineTax, TaxError> {
    let taxes = if exempt {
        Vec::new()
    } else {
        rates
            .iter()
            .map(|rate| {
                Ok(AppliedTax {
                    code: rate.code.clone(),
                    rate_bps: rate.rate_bps,
                    tax: pricing.tax_on(gross, rate.rate_bps)?,
                })
            })
            .collect::<Result<Vec<_>, TaxError>>()?
    };

    let base = if pricing.inclusive {
        let extracted = sum_minor(taxes.iter().map(|t| t.tax))?;
        gross
            .checked_sub(extracted)
            .ok_or_else(|| TaxError::Arithmetic(format!("line {line_id}: base underflows")))?
    } else {
        gross
    };

    tracing::trace!(line_id, gross, base, rates = taxes.len(), "line taxed");

    Ok(LineTax {
        line_id: line_id.to_string(),
        gross,
        base,
        exempt,
        taxes,
    })
}
