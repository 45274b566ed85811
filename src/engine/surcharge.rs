//! Percentage surcharges (service charge and similar).

use serde::Serialize;

use super::line::{AppliedTax, LineTax, Pricing};
use super::resolver::EffectiveProfile;
use crate::core::{OrderType, SurchargeRule, TaxError, percent_of, sum_minor};

/// Computed result for one applied surcharge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SurchargeTax {
    pub code: String,
    pub label: String,
    /// Percentage of the line bases. Persisted as-is in the snapshot.
    pub base: i64,
    /// Tax charged on the surcharge, if taxable under a known rate.
    pub applied: Option<AppliedTax>,
}

impl SurchargeTax {
    pub fn tax(&self) -> i64 {
        self.applied.as_ref().map_or(0, |t| t.tax)
    }
}

/// Whether `rule` applies to an order of `order_type`.
pub fn surcharge_applies(rule: &SurchargeRule, order_type: OrderType) -> bool {
    if rule.percent_bps == 0 {
        return false;
    }
    match rule.apply_when_order_type_in.as_deref() {
        Some(types) if !types.is_empty() => types.contains(&order_type),
        _ => true,
    }
}

/// Compute every applicable surcharge over `lines`.
///
/// The eligible base is the sum of all line bases, exempt lines included.
/// A taxable surcharge keeps its base; the pricing mode only decides how
/// the tax on it is computed.
pub fn apply_surcharges(
    profile: &EffectiveProfile,
    order_type: OrderType,
    lines: &[LineTax],
) -> Result<Vec<SurchargeTax>, TaxError> {
    let eligible = sum_minor(lines.iter().map(|l| l.base))?;
    let pricing = Pricing {
        inclusive: profile.prices_include_tax,
        rounding: profile.rounding,
    };

    profile
        .surcharges
        .iter()
        .filter(|rule| surcharge_applies(rule, order_type))
        .map(|rule| compute_surcharge(profile, rule, eligible, pricing))
        .collect()
}

fn compute_surcharge(
    profile: &EffectiveProfile,
    rule: &SurchargeRule,
    eligible: i64,
    pricing: Pricing,
) -> Result<SurchargeTax, TaxError> {
    let base = percent_of(eligible, rule.percent_bps, pricing.rounding)?;

    let rate = rule
        .tax_code
        .as_deref()
        .filter(|_| rule.taxable)
        .and_then(|code| profile.rate(code));

    let applied = rate
        .map(|rate| {
            Ok::<_, TaxError>(AppliedTax {
                code: rate.code.clone(),
                rate_bps: rate.rate_bps,
                tax: pricing.tax_on(base, rate.rate_bps)?,
            })
        })
        .transpose()?;

    if rule.taxable && applied.is_none() {
        tracing::debug!(surcharge = %rule.code, "taxable surcharge has no resolvable rate");
    }

    let surcharge = SurchargeTax {
        code: rule.code.clone(),
        label: rule.label.clone(),
        base,
        applied,
    };
    tracing::debug!(surcharge = %surcharge.code, base, tax = surcharge.tax(), "surcharge applied");
    Ok(surcharge)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;

    fn line(base: i64) -> LineTax {
        LineTax {
            line_id: "1".into(),
            gross: base,
            base,
            exempt: false,
            taxes: Vec::new(),
        }
    }

    fn effective(profile: TaxProfile) -> EffectiveProfile {
        EffectiveProfile::resolve(&profile, None)
    }

    #[test]
    fn untaxed_service_charge() {
        let p = effective(
            TaxProfileBuilder::new("GT", "GTQ")
                .add_surcharge(SurchargeBuilder::new("service", 1000).build())
                .build(),
        );
        let out = apply_surcharges(&p, OrderType::DineIn, &[line(4464), line(1000)]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].base, 546);
        assert_eq!(out[0].tax(), 0);
    }

    #[test]
    fn taxable_exclusive_surcharge() {
        let p = effective(
            TaxProfileBuilder::new("GT", "GTQ")
                .add_rate(TaxRateBuilder::new("iva", 1200).build())
                .add_surcharge(SurchargeBuilder::new("service", 1000).taxable("iva").build())
                .build(),
        );
        let out = apply_surcharges(&p, OrderType::DineIn, &[line(10000)]).unwrap();
        assert_eq!(out[0].base, 1000);
        assert_eq!(out[0].tax(), 120);
        assert_eq!(out[0].applied.as_ref().unwrap().code, "iva");
    }

    #[test]
    fn taxable_inclusive_surcharge_keeps_its_base() {
        let p = effective(
            TaxProfileBuilder::new("GT", "GTQ")
                .prices_include_tax(true)
                .add_rate(TaxRateBuilder::new("iva", 1200).build())
                .add_surcharge(SurchargeBuilder::new("service", 1000).taxable("iva").build())
                .build(),
        );
        // 10% of 10000 = 1000; tax extracted as 1000 × 1200 / 11200 = 107.14
        let out = apply_surcharges(&p, OrderType::DineIn, &[line(10000)]).unwrap();
        assert_eq!(out[0].base, 1000);
        assert_eq!(out[0].tax(), 107);
    }

    #[test]
    fn unresolved_tax_code_is_untaxed() {
        let p = effective(
            TaxProfileBuilder::new("GT", "GTQ")
                .add_surcharge(SurchargeBuilder::new("service", 1000).taxable("missing").build())
                .build(),
        );
        let out = apply_surcharges(&p, OrderType::DineIn, &[line(10000)]).unwrap();
        assert_eq!(out[0].base, 1000);
        assert!(out[0].applied.is_none());
    }

    #[test]
    fn tax_code_without_taxable_flag_is_ignored() {
        let mut rule = SurchargeBuilder::new("service", 1000).taxable("iva").build();
        rule.taxable = false;
        let p = effective(
            TaxProfileBuilder::new("GT", "GTQ")
                .add_rate(TaxRateBuilder::new("iva", 1200).build())
                .add_surcharge(rule)
                .build(),
        );
        let out = apply_surcharges(&p, OrderType::DineIn, &[line(10000)]).unwrap();
        assert!(out[0].applied.is_none());
    }

    #[test]
    fn order_type_condition_and_zero_percent() {
        let rules = [
            SurchargeBuilder::new("service", 1000)
                .order_types([OrderType::DineIn])
                .build(),
            SurchargeBuilder::new("packaging", 0).build(),
        ];
        assert!(surcharge_applies(&rules[0], OrderType::DineIn));
        assert!(!surcharge_applies(&rules[0], OrderType::Takeaway));
        assert!(!surcharge_applies(&rules[1], OrderType::DineIn));
    }

    #[test]
    fn exempt_line_bases_count_toward_surcharge() {
        let p = effective(
            TaxProfileBuilder::new("GT", "GTQ")
                .add_surcharge(SurchargeBuilder::new("service", 1000).build())
                .build(),
        );
        let mut exempt = line(2000);
        exempt.exempt = true;
        let out = apply_surcharges(&p, OrderType::DineIn, &[line(1000), exempt]).unwrap();
        assert_eq!(out[0].base, 300);
    }
}
