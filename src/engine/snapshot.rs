//! Aggregation of line and surcharge results into a [`TaxSnapshot`].

use super::line::{AppliedTax, LineTax};
use super::surcharge::SurchargeTax;
use crate::core::{
    CustomerInfo, RateSummary, SnapshotCustomer, SnapshotTotals, SurchargeSummary, TaxError,
    TaxRateRule, TaxSnapshot, sum_minor,
};

impl TaxSnapshot {
    /// The snapshot of an empty cart: every total zero.
    pub fn zero(currency: impl Into<String>, customer: &CustomerInfo) -> Self {
        Self {
            currency: currency.into(),
            totals: SnapshotTotals::default(),
            summary_by_rate: Vec::new(),
            surcharges: Vec::new(),
            customer: snapshot_customer(customer),
        }
    }
}

/// Assemble the immutable snapshot.
///
/// `rates` is the effective rate list; it fixes the order of the rate
/// summary. Codes that never applied to anything are left out.
pub fn assemble(
    currency: &str,
    customer: &CustomerInfo,
    rates: &[TaxRateRule],
    lines: &[LineTax],
    surcharges: &[SurchargeTax],
) -> Result<TaxSnapshot, TaxError> {
    let applied = lines
        .iter()
        .flat_map(|l| l.taxes.iter())
        .chain(surcharges.iter().filter_map(|s| s.applied.as_ref()));
    let summary_by_rate = summarize(applied, rates)?;

    let sub_total = sum_minor(lines.iter().map(|l| l.base))?;
    let tax = sum_minor(summary_by_rate.iter().map(|s| s.tax))?;
    let surcharge_total = sum_minor(surcharges.iter().map(|s| s.base))?;
    let grand_total = sum_minor([sub_total, tax, surcharge_total])?;

    tracing::debug!(sub_total, tax, grand_total, "snapshot assembled");

    Ok(TaxSnapshot {
        currency: currency.to_string(),
        totals: SnapshotTotals {
            sub_total,
            tax,
            grand_total,
        },
        summary_by_rate,
        surcharges: surcharges
            .iter()
            .map(|s| SurchargeSummary {
                base: s.base,
                tax: s.tax(),
            })
            .collect(),
        customer: snapshot_customer(customer),
    })
}

/// Group applied taxes by rate code, ordered by rate declaration.
fn summarize<'a>(
    applied: impl Iterator<Item = &'a AppliedTax>,
    rates: &[TaxRateRule],
) -> Result<Vec<RateSummary>, TaxError> {
    let mut summary: Vec<RateSummary> = Vec::new();
    for tax in applied {
        match summary.iter_mut().find(|s| s.code == tax.code) {
            Some(entry) => {
                entry.tax = entry
                    .tax
                    .checked_add(tax.tax)
                    .ok_or_else(|| TaxError::Arithmetic(format!("rate {}: total overflows", tax.code)))?;
            }
            None => summary.push(RateSummary {
                code: tax.code.clone(),
                rate_bps: tax.rate_bps,
                tax: tax.tax,
            }),
        }
    }
    summary.sort_by_key(|s| rates.iter().position(|r| r.code == s.code));
    Ok(summary)
}

fn snapshot_customer(customer: &CustomerInfo) -> SnapshotCustomer {
    SnapshotCustomer {
        tax_id: customer
            .tax_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::TaxRateBuilder;

    fn applied(code: &str, rate_bps: u32, tax: i64) -> AppliedTax {
        AppliedTax {
            code: code.into(),
            rate_bps,
            tax,
        }
    }

    fn line(base: i64, taxes: Vec<AppliedTax>) -> LineTax {
        LineTax {
            line_id: "x".into(),
            gross: base,
            base,
            exempt: false,
            taxes,
        }
    }

    #[test]
    fn groups_by_code_in_declaration_order() {
        let rates = [
            TaxRateBuilder::new("iva", 1200).build(),
            TaxRateBuilder::new("tur", 1000).build(),
        ];
        let lines = [
            line(1000, vec![applied("tur", 1000, 100)]),
            line(2000, vec![applied("iva", 1200, 240), applied("tur", 1000, 200)]),
        ];
        let snap = assemble("GTQ", &CustomerInfo::default(), &rates, &lines, &[]).unwrap();
        let codes: Vec<_> = snap.summary_by_rate().iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, ["iva", "tur"]);
        assert_eq!(snap.summary_by_rate()[1].tax, 300);
        assert_eq!(snap.totals().sub_total, 3000);
        assert_eq!(snap.totals().tax, 540);
        assert_eq!(snap.totals().grand_total, 3540);
    }

    #[test]
    fn surcharge_tax_joins_rate_summary() {
        let rates = [TaxRateBuilder::new("iva", 1200).build()];
        let lines = [line(10000, vec![applied("iva", 1200, 1200)])];
        let surcharges = [SurchargeTax {
            code: "service".into(),
            label: String::new(),
            base: 1000,
            applied: Some(applied("iva", 1200, 120)),
        }];
        let snap = assemble("GTQ", &CustomerInfo::default(), &rates, &lines, &surcharges).unwrap();
        assert_eq!(snap.summary_by_rate().len(), 1);
        assert_eq!(snap.summary_by_rate()[0].tax, 1320);
        assert_eq!(snap.surcharges()[0], SurchargeSummary { base: 1000, tax: 120 });
        assert_eq!(snap.totals().grand_total, 10000 + 1320 + 1000);
    }

    #[test]
    fn customer_tax_id_is_trimmed() {
        let customer = CustomerInfo {
            tax_id: Some("  1234567-8 ".into()),
            name: Some("Comercial S.A.".into()),
        };
        let snap = TaxSnapshot::zero("GTQ", &customer);
        assert_eq!(snap.customer().tax_id.as_deref(), Some("1234567-8"));

        let blank = CustomerInfo {
            tax_id: Some("   ".into()),
            name: None,
        };
        assert_eq!(TaxSnapshot::zero("GTQ", &blank).customer().tax_id, None);
    }
}
