use std::collections::HashSet;

use super::countries::is_known_country_code;
use super::currencies::is_known_currency_code;
use super::error::ValidationError;
use super::types::*;

/// Structural checks on an order draft.
/// Returns all problems found (not just the first).
///
/// `currency` is the currency of the profile the draft is priced in.
pub fn validate_draft(draft: &OrderDraft, currency: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !draft.currency.is_empty() && !draft.currency.eq_ignore_ascii_case(currency) {
        errors.push(ValidationError::new(
            "currency",
            format!(
                "order currency '{}' does not match profile currency '{currency}'",
                draft.currency
            ),
        ));
    }

    if draft.delivery_fee_minor_units < 0 {
        errors.push(ValidationError::new(
            "delivery_fee_minor_units",
            format!(
                "delivery fee must not be negative (got {})",
                draft.delivery_fee_minor_units
            ),
        ));
    }

    let mut seen = HashSet::new();
    for (i, line) in draft.lines.iter().enumerate() {
        let prefix = format!("lines[{i}]");

        if line.line_id.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.line_id"),
                "line identifier must not be empty",
            ));
        } else if !seen.insert(line.line_id.as_str()) {
            errors.push(ValidationError::new(
                format!("{prefix}.line_id"),
                format!("duplicate line identifier '{}'", line.line_id),
            ));
        }

        // Refund and void lines are separate documents; a non-positive
        // quantity here is never clamped.
        if line.quantity <= 0 {
            errors.push(ValidationError::new(
                format!("{prefix}.quantity"),
                format!("quantity must be greater than zero (got {})", line.quantity),
            ));
        }

        if line.gross_minor_units().is_none() {
            errors.push(ValidationError::new(
                format!("{prefix}.unit_price_minor_units"),
                "line amount is out of range",
            ));
        }
    }

    errors
}

/// Lint a tax profile for authoring mistakes.
///
/// The engine never calls this; configuration tooling runs it before a
/// profile is activated. Each jurisdiction is checked as the effective
/// scope it produces.
pub fn validate_profile(profile: &TaxProfile) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !is_known_country_code(&profile.country) {
        errors.push(ValidationError::new(
            "country",
            format!("'{}' is not a known ISO 3166-1 country code", profile.country),
        ));
    }

    if !is_known_currency_code(&profile.currency) {
        errors.push(ValidationError::new(
            "currency",
            format!("'{}' is not a known ISO 4217 currency code", profile.currency),
        ));
    }

    validate_scope(
        "",
        &profile.rates,
        &profile.surcharges,
        &profile.delivery,
        &mut errors,
    );

    let mut codes = HashSet::new();
    for (i, jurisdiction) in profile.jurisdictions.iter().enumerate() {
        let prefix = format!("jurisdictions[{i}]");

        if jurisdiction.code.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.code"),
                "jurisdiction code must not be empty",
            ));
        } else if !codes.insert(jurisdiction.code.as_str()) {
            errors.push(ValidationError::new(
                format!("{prefix}.code"),
                format!("duplicate jurisdiction code '{}'", jurisdiction.code),
            ));
        }

        let criteria = &jurisdiction.matcher;
        if criteria.is_empty() {
            errors.push(ValidationError::new(
                format!("{prefix}.match"),
                "match has no criteria and can never apply",
            ));
        }
        if let Some(country) = &criteria.country {
            if !is_known_country_code(country) {
                errors.push(ValidationError::new(
                    format!("{prefix}.match.country"),
                    format!("'{country}' is not a known ISO 3166-1 country code"),
                ));
            }
        }
        if criteria.zip_prefix.as_deref().is_some_and(|z| z.trim().is_empty()) {
            errors.push(ValidationError::new(
                format!("{prefix}.match.zip_prefix"),
                "zip prefix must not be empty",
            ));
        }

        let overrides_anything = jurisdiction.rates_override.is_some()
            || jurisdiction.surcharges_override.is_some()
            || jurisdiction.delivery_override.is_some()
            || jurisdiction.prices_include_tax_override.is_some()
            || jurisdiction.rounding_override.is_some();
        if !overrides_anything {
            errors.push(ValidationError::new(
                prefix.clone(),
                "jurisdiction overrides nothing",
            ));
        }

        // Only re-check the scope when the jurisdiction changes part of it.
        if jurisdiction.rates_override.is_some()
            || jurisdiction.surcharges_override.is_some()
            || jurisdiction.delivery_override.is_some()
        {
            validate_scope(
                &format!("{prefix}."),
                jurisdiction.rates_override.as_deref().unwrap_or(&profile.rates),
                jurisdiction
                    .surcharges_override
                    .as_deref()
                    .unwrap_or(&profile.surcharges),
                jurisdiction
                    .delivery_override
                    .as_ref()
                    .unwrap_or(&profile.delivery),
                &mut errors,
            );
        }
    }

    if let Some(b2b) = &profile.b2b {
        if b2b.require_tax_id && !b2b.enabled {
            errors.push(ValidationError::new(
                "b2b.require_tax_id",
                "requireTaxId has no effect while b2b is disabled",
            ));
        }
    }

    errors
}

fn validate_scope(
    prefix: &str,
    rates: &[TaxRateRule],
    surcharges: &[SurchargeRule],
    delivery: &DeliveryPolicy,
    errors: &mut Vec<ValidationError>,
) {
    let mut rate_codes = HashSet::new();
    for (i, rate) in rates.iter().enumerate() {
        let field = format!("{prefix}rates[{i}]");
        if rate.code.trim().is_empty() {
            errors.push(ValidationError::new(
                format!("{field}.code"),
                "rate code must not be empty",
            ));
        } else if !rate_codes.insert(rate.code.as_str()) {
            errors.push(ValidationError::new(
                format!("{field}.code"),
                format!("duplicate rate code '{}'", rate.code),
            ));
        }

        let has_filters = rate.item_category_in.is_some()
            || rate.item_tag_in.is_some()
            || rate.exclude_item_tag_in.is_some()
            || rate.order_type_in.is_some();
        if rate.applies_to == AppliesTo::All && has_filters {
            errors.push(ValidationError::new(
                format!("{field}.applies_to"),
                "filters are ignored when appliesTo is 'all'",
            ));
        }
    }

    let mut surcharge_codes = HashSet::new();
    for (i, surcharge) in surcharges.iter().enumerate() {
        let field = format!("{prefix}surcharges[{i}]");
        if !surcharge_codes.insert(surcharge.code.as_str()) {
            errors.push(ValidationError::new(
                format!("{field}.code"),
                format!("duplicate surcharge code '{}'", surcharge.code),
            ));
        }
        if surcharge.taxable {
            check_tax_code(&field, surcharge.tax_code.as_deref(), &rate_codes, errors);
        }
    }

    if delivery.mode == DeliveryMode::AsLine && delivery.taxable {
        check_tax_code(
            &format!("{prefix}delivery"),
            delivery.tax_code.as_deref(),
            &rate_codes,
            errors,
        );
    }
}

fn check_tax_code(
    field: &str,
    tax_code: Option<&str>,
    rate_codes: &HashSet<&str>,
    errors: &mut Vec<ValidationError>,
) {
    match tax_code {
        None => errors.push(ValidationError::new(
            format!("{field}.tax_code"),
            "taxable without a taxCode; no tax will be charged",
        )),
        Some(code) if !rate_codes.contains(code) => errors.push(ValidationError::new(
            format!("{field}.tax_code"),
            format!("taxCode '{code}' does not match any rate in scope"),
        )),
        Some(_) => {}
    }
}

/// Re-check the arithmetic of a persisted snapshot (cashier reconciliation).
pub fn verify_snapshot(snapshot: &TaxSnapshot) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let totals = snapshot.totals();

    if !is_known_currency_code(snapshot.currency()) {
        errors.push(ValidationError::new(
            "currency",
            format!("'{}' is not a known ISO 4217 currency code", snapshot.currency()),
        ));
    }

    // i128 so that a corrupted snapshot cannot overflow the check itself
    let summary_tax: i128 = snapshot
        .summary_by_rate()
        .iter()
        .map(|s| i128::from(s.tax))
        .sum();
    if i128::from(totals.tax) != summary_tax {
        errors.push(ValidationError::new(
            "totals.tax",
            format!(
                "tax total {} does not match sum of rate summaries {summary_tax}",
                totals.tax
            ),
        ));
    }

    let surcharge_bases: i128 = snapshot
        .surcharges()
        .iter()
        .map(|s| i128::from(s.base))
        .sum();
    let expected_grand = i128::from(totals.sub_total) + i128::from(totals.tax) + surcharge_bases;
    if i128::from(totals.grand_total) != expected_grand {
        errors.push(ValidationError::new(
            "totals.grand_total",
            format!(
                "grand total {} does not match subtotal {} + tax {} + surcharges {surcharge_bases}",
                totals.grand_total, totals.sub_total, totals.tax
            ),
        ));
    }

    let mut codes = HashSet::new();
    for (i, summary) in snapshot.summary_by_rate().iter().enumerate() {
        if !codes.insert(summary.code.as_str()) {
            errors.push(ValidationError::new(
                format!("summary_by_rate[{i}].code"),
                format!("rate code '{}' appears more than once", summary.code),
            ));
        }
    }

    errors
}

/// Check whether a snapshot may be issued as a B2B invoice under `profile`.
pub fn validate_invoice_issuance(
    snapshot: &TaxSnapshot,
    profile: &TaxProfile,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let Some(b2b) = profile.b2b.as_ref().filter(|b| b.enabled) else {
        errors.push(ValidationError::new(
            "b2b.enabled",
            "profile does not allow B2B invoice issuance",
        ));
        return errors;
    };

    if b2b.require_tax_id && snapshot.customer().tax_id.is_none() {
        errors.push(ValidationError::new(
            "customer.tax_id",
            "customer tax ID is required for invoice issuance",
        ));
    }

    if !snapshot.currency().eq_ignore_ascii_case(&profile.currency) {
        errors.push(ValidationError::new(
            "currency",
            format!(
                "snapshot currency '{}' differs from profile currency '{}'",
                snapshot.currency(),
                profile.currency
            ),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder::*;

    fn profile() -> TaxProfile {
        TaxProfileBuilder::new("GT", "GTQ")
            .add_rate(TaxRateBuilder::new("iva", 1200).build())
            .build()
    }

    fn line(id: &str, qty: i64) -> OrderLineInput {
        LineBuilder::new(id, "Pepián", qty, 4500).build()
    }

    fn snapshot(sub: i64, tax: i64, grand: i64, summary: &[(&str, i64)]) -> TaxSnapshot {
        TaxSnapshot {
            currency: "GTQ".into(),
            totals: SnapshotTotals {
                sub_total: sub,
                tax,
                grand_total: grand,
            },
            summary_by_rate: summary
                .iter()
                .map(|(code, tax)| RateSummary {
                    code: code.to_string(),
                    rate_bps: 1200,
                    tax: *tax,
                })
                .collect(),
            surcharges: Vec::new(),
            customer: SnapshotCustomer::default(),
        }
    }

    #[test]
    fn valid_draft_has_no_errors() {
        let draft = OrderDraftBuilder::new(OrderType::DineIn)
            .currency("GTQ")
            .add_line(line("1", 2))
            .build()
            .unwrap();
        assert!(validate_draft(&draft, "GTQ").is_empty());
    }

    #[test]
    fn draft_currency_is_case_insensitive() {
        let draft = OrderDraftBuilder::new(OrderType::DineIn)
            .currency("gtq")
            .build()
            .unwrap();
        assert!(validate_draft(&draft, "GTQ").is_empty());
    }

    #[test]
    fn negative_and_zero_quantities_rejected() {
        let draft = OrderDraftBuilder::new(OrderType::DineIn)
            .add_line(line("1", -1))
            .add_line(line("2", 0))
            .build()
            .unwrap();
        let errors = validate_draft(&draft, "GTQ");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "lines[0].quantity");
        assert_eq!(errors[1].field, "lines[1].quantity");
    }

    #[test]
    fn duplicate_and_empty_line_ids_rejected() {
        let draft = OrderDraftBuilder::new(OrderType::DineIn)
            .add_line(line("a", 1))
            .add_line(line("a", 1))
            .add_line(line(" ", 1))
            .build()
            .unwrap();
        let errors = validate_draft(&draft, "GTQ");
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("duplicate"));
        assert!(errors[1].message.contains("empty"));
    }

    #[test]
    fn overflowing_line_rejected() {
        let draft = OrderDraftBuilder::new(OrderType::DineIn)
            .add_line(LineBuilder::new("1", "x", 2, i64::MAX).build())
            .build()
            .unwrap();
        let errors = validate_draft(&draft, "GTQ");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("out of range"));
    }

    #[test]
    fn currency_mismatch_and_negative_fee() {
        let draft = OrderDraftBuilder::new(OrderType::Delivery)
            .currency("USD")
            .delivery_fee(-100)
            .build()
            .unwrap();
        let errors = validate_draft(&draft, "GTQ");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "currency");
        assert_eq!(errors[1].field, "delivery_fee_minor_units");
    }

    #[test]
    fn clean_profile_passes_lint() {
        assert!(validate_profile(&profile()).is_empty());
    }

    #[test]
    fn lint_catches_duplicate_rates_and_unknown_codes() {
        let p = TaxProfileBuilder::new("XX", "ZZZ")
            .add_rate(TaxRateBuilder::new("iva", 1200).build())
            .add_rate(TaxRateBuilder::new("iva", 500).build())
            .build();
        let errors = validate_profile(&p);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["country", "currency", "rates[1].code"]);
    }

    #[test]
    fn lint_catches_unresolved_tax_codes() {
        let p = TaxProfileBuilder::new("GT", "GTQ")
            .add_rate(TaxRateBuilder::new("iva", 1200).build())
            .add_surcharge(SurchargeBuilder::new("service", 1000).taxable("vat").build())
            .delivery(DeliveryPolicy::taxable_line("std"))
            .build();
        let errors = validate_profile(&p);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "surcharges[0].tax_code");
        assert_eq!(errors[1].field, "delivery.tax_code");
    }

    #[test]
    fn lint_checks_jurisdiction_effective_scope() {
        // The override drops "iva", so the base surcharge no longer resolves.
        let p = TaxProfileBuilder::new("GT", "GTQ")
            .add_rate(TaxRateBuilder::new("iva", 1200).build())
            .add_surcharge(SurchargeBuilder::new("service", 1000).taxable("iva").build())
            .add_jurisdiction(
                JurisdictionBuilder::new("zone-free")
                    .zip_prefix("09")
                    .rates(vec![TaxRateBuilder::new("zf", 0).build()])
                    .build(),
            )
            .build();
        let errors = validate_profile(&p);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "jurisdictions[0].surcharges[0].tax_code");
    }

    #[test]
    fn lint_catches_empty_match_and_noop_jurisdiction() {
        let p = TaxProfileBuilder::new("GT", "GTQ")
            .add_jurisdiction(JurisdictionBuilder::new("nowhere").build())
            .build();
        let errors = validate_profile(&p);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "jurisdictions[0].match");
        assert_eq!(errors[1].field, "jurisdictions[0]");
    }

    #[test]
    fn lint_flags_filters_on_all_rule() {
        let p = TaxProfileBuilder::new("GT", "GTQ")
            .add_rate(
                TaxRateBuilder::new("iva", 1200)
                    .tags(["alcohol"])
                    .applies_to(AppliesTo::All)
                    .build(),
            )
            .build();
        let errors = validate_profile(&p);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "rates[0].applies_to");
    }

    #[test]
    fn lint_flags_b2b_tax_id_without_b2b() {
        let p = TaxProfileBuilder::new("GT", "GTQ").b2b(false, true).build();
        let errors = validate_profile(&p);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "b2b.require_tax_id");
    }

    #[test]
    fn consistent_snapshot_verifies() {
        let s = snapshot(4464, 536, 5000, &[("iva", 536)]);
        assert!(verify_snapshot(&s).is_empty());
    }

    #[test]
    fn tampered_snapshot_detected() {
        let s = snapshot(4464, 536, 5100, &[("iva", 500)]);
        let errors = verify_snapshot(&s);
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["totals.tax", "totals.grand_total"]);
    }

    #[test]
    fn duplicate_summary_codes_detected() {
        let s = snapshot(1000, 240, 1240, &[("iva", 120), ("iva", 120)]);
        let errors = verify_snapshot(&s);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "summary_by_rate[1].code");
    }

    #[test]
    fn issuance_requires_b2b() {
        let s = snapshot(0, 0, 0, &[]);
        let errors = validate_invoice_issuance(&s, &profile());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "b2b.enabled");
    }

    #[test]
    fn issuance_requires_tax_id_when_configured() {
        let p = TaxProfileBuilder::new("GT", "GTQ").b2b(true, true).build();
        let mut s = snapshot(0, 0, 0, &[]);
        assert_eq!(validate_invoice_issuance(&s, &p).len(), 1);

        s.customer.tax_id = Some("1234567-8".into());
        assert!(validate_invoice_issuance(&s, &p).is_empty());
    }
}
