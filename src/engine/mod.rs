//! The tax calculation pipeline.
//!
//! ```text
//! TaxProfile ──resolve──▶ EffectiveProfile
//!                              │
//! OrderDraft ──▶ match rates ──▶ tax lines ──▶ surcharges ──▶ delivery line ──▶ TaxSnapshot
//! ```
//!
//! Every stage is a pure function of its inputs: no I/O, no shared state,
//! no clock. Calling the engine twice with the same inputs yields identical
//! snapshots, so checkout can recompute on every cart edit.
//!
//! # Example
//!
//! ```
//! use tributo::core::*;
//! use tributo::engine::calculate_tax_snapshot;
//!
//! let profile = TaxProfileBuilder::new("GT", "GTQ")
//!     .prices_include_tax(true)
//!     .add_rate(TaxRateBuilder::new("std", 1200).build())
//!     .build();
//! let draft = OrderDraftBuilder::new(OrderType::DineIn)
//!     .add_line(LineBuilder::new("1", "Pepián", 2, 2500).build())
//!     .build()
//!     .unwrap();
//!
//! let snapshot = calculate_tax_snapshot(&draft, &profile).unwrap();
//! assert_eq!(snapshot.totals().tax, 536);
//! assert_eq!(snapshot.totals().sub_total, 4464);
//! assert_eq!(snapshot.totals().grand_total, 5000);
//! ```

mod delivery;
mod line;
mod matcher;
mod resolver;
mod snapshot;
mod surcharge;

pub use delivery::{DELIVERY_LINE_ID, delivery_line};
pub use line::{AppliedTax, LineTax, Pricing, tax_line};
pub use matcher::{matching_rates, rule_matches};
pub use resolver::{EffectiveProfile, Specificity, match_specificity, select_jurisdiction};
pub use snapshot::assemble;
pub use surcharge::{SurchargeTax, apply_surcharges, surcharge_applies};

use serde::Serialize;

use crate::core::{OrderDraft, TaxError, TaxProfile, TaxSnapshot, validate_draft};

/// A snapshot together with the per-line and per-surcharge detail behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub snapshot: TaxSnapshot,
    /// Order lines in input order, followed by the delivery line if any.
    pub lines: Vec<LineTax>,
    pub surcharges: Vec<SurchargeTax>,
    /// Jurisdiction whose overrides were applied.
    pub jurisdiction: Option<String>,
}

/// Calculate the tax snapshot of `draft` under `profile`.
///
/// The jurisdiction is resolved from the draft's delivery address. Fails only
/// on structurally invalid input ([`TaxError::InvalidInput`]) or amounts
/// outside the representable range ([`TaxError::Arithmetic`]).
pub fn calculate_tax_snapshot(
    draft: &OrderDraft,
    profile: &TaxProfile,
) -> Result<TaxSnapshot, TaxError> {
    calculate_breakdown(draft, profile).map(|b| b.snapshot)
}

/// Like [`calculate_tax_snapshot`], keeping the intermediate results.
#[tracing::instrument(level = "debug", skip_all, fields(lines = draft.lines.len(), order_type = draft.order_type.code()))]
pub fn calculate_breakdown(
    draft: &OrderDraft,
    profile: &TaxProfile,
) -> Result<TaxBreakdown, TaxError> {
    let effective = EffectiveProfile::resolve(profile, draft.delivery_address.as_ref());
    compute(draft, &effective)
}

/// Run the pipeline against an already resolved profile.
pub fn compute(draft: &OrderDraft, profile: &EffectiveProfile) -> Result<TaxBreakdown, TaxError> {
    let errors = validate_draft(draft, &profile.currency);
    if !errors.is_empty() {
        tracing::debug!(errors = errors.len(), "order draft rejected");
        return Err(TaxError::invalid_input(&errors));
    }

    let currency = profile.currency.as_str();

    if draft.lines.is_empty() {
        return Ok(TaxBreakdown {
            snapshot: TaxSnapshot::zero(currency, &draft.customer),
            lines: Vec::new(),
            surcharges: Vec::new(),
            jurisdiction: profile.jurisdiction.clone(),
        });
    }

    let pricing = Pricing {
        inclusive: profile.prices_include_tax,
        rounding: profile.rounding,
    };
    tracing::debug!(
        inclusive = pricing.inclusive,
        rounding = pricing.rounding.code(),
        rates = profile.rates.len(),
        "pricing resolved"
    );

    let mut lines = draft
        .lines
        .iter()
        .map(|line| {
            let gross = line.gross_minor_units().ok_or_else(|| {
                TaxError::Arithmetic(format!("line {}: amount out of range", line.line_id))
            })?;
            let rates = matching_rates(line, draft.order_type, &profile.rates);
            tax_line(&line.line_id, gross, line.tax_exempt, &rates, pricing)
        })
        .collect::<Result<Vec<_>, TaxError>>()?;

    let surcharges = apply_surcharges(profile, draft.order_type, &lines)?;

    if let Some(line) = delivery_line(profile, draft.order_type, draft.delivery_fee_minor_units)? {
        lines.push(line);
    }

    let snapshot = assemble(
        currency,
        &draft.customer,
        &profile.rates,
        &lines,
        &surcharges,
    )?;

    Ok(TaxBreakdown {
        snapshot,
        lines,
        surcharges,
        jurisdiction: profile.jurisdiction.clone(),
    })
}
