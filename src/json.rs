//! JSON documents: tax profiles and order drafts in, snapshots out.
//!
//! Field names are camelCase and match the documents kept in the
//! configuration store and the persisted snapshot contract.
//!
//! ```
//! use tributo::core::TaxProfile;
//!
//! let profile = TaxProfile::from_json(r#"{
//!     "country": "GT",
//!     "currency": "GTQ",
//!     "pricesIncludeTax": true,
//!     "rates": [{ "code": "iva", "label": "IVA", "rateBps": 1200, "appliesTo": "all" }]
//! }"#).unwrap();
//!
//! assert_eq!(profile.rates[0].rate_bps, 1200);
//! assert!(profile.jurisdictions.is_empty());
//! ```

use crate::core::{OrderDraft, TaxError, TaxProfile, TaxSnapshot};

impl TaxProfile {
    pub fn from_json(json: &str) -> Result<Self, TaxError> {
        serde_json::from_str(json).map_err(|e| TaxError::Config(format!("tax profile: {e}")))
    }

    pub fn to_json(&self) -> Result<String, TaxError> {
        serde_json::to_string_pretty(self).map_err(|e| TaxError::Config(e.to_string()))
    }
}

impl OrderDraft {
    pub fn from_json(json: &str) -> Result<Self, TaxError> {
        serde_json::from_str(json).map_err(|e| TaxError::Config(format!("order draft: {e}")))
    }
}

impl TaxSnapshot {
    /// Compact JSON in the persisted shape. Identical snapshots produce
    /// byte-identical output.
    pub fn to_json(&self) -> Result<String, TaxError> {
        serde_json::to_string(self).map_err(|e| TaxError::Config(e.to_string()))
    }

    /// Read back a persisted snapshot.
    pub fn from_json(json: &str) -> Result<Self, TaxError> {
        serde_json::from_str(json).map_err(|e| TaxError::Config(format!("tax snapshot: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::core::*;

    #[test]
    fn profile_defaults_for_missing_sections() {
        let p = TaxProfile::from_json(r#"{"country":"GT","currency":"GTQ"}"#).unwrap();
        assert!(!p.prices_include_tax);
        assert_eq!(p.rounding, None);
        assert!(p.rates.is_empty());
        assert_eq!(p.delivery, DeliveryPolicy::out_of_scope());
        assert!(p.b2b.is_none());
    }

    #[test]
    fn full_profile_document() {
        let p = TaxProfile::from_json(
            r#"{
            "country": "GT",
            "currency": "GTQ",
            "pricesIncludeTax": true,
            "rounding": "half_even",
            "rates": [
                {"code": "iva", "label": "IVA", "rateBps": 1200, "appliesTo": "all"},
                {"code": "tur", "label": "Turismo", "rateBps": 1000, "appliesTo": "filtered",
                 "itemTagIn": ["lodging"], "orderTypeIn": ["dine_in"]}
            ],
            "surcharges": [
                {"code": "service", "label": "Servicio", "percentBps": 1000,
                 "applyWhenOrderTypeIn": ["dine_in"], "taxable": true, "taxCode": "iva"}
            ],
            "delivery": {"mode": "as_line", "taxable": true, "taxCode": "iva"},
            "jurisdictions": [
                {"code": "gt-01", "match": {"country": "GT", "zipPrefix": "01"},
                 "ratesOverride": [{"code": "iva", "rateBps": 1200, "appliesTo": "all"}],
                 "roundingOverride": "half_up"}
            ],
            "b2b": {"enabled": true, "requireTaxId": true}
        }"#,
        )
        .unwrap();

        assert_eq!(p.rounding, Some(RoundingMode::HalfEven));
        assert_eq!(p.rates[1].applies_to, AppliesTo::Filtered);
        assert_eq!(p.rates[1].order_type_in, Some(vec![OrderType::DineIn]));
        assert_eq!(p.surcharges[0].tax_code.as_deref(), Some("iva"));
        assert_eq!(p.delivery.mode, DeliveryMode::AsLine);
        assert_eq!(p.jurisdictions[0].matcher.zip_prefix.as_deref(), Some("01"));
        assert_eq!(
            p.jurisdictions[0].rates_override.as_ref().map(|r| r[0].applies_to),
            Some(AppliesTo::All)
        );
        assert!(p.b2b.unwrap().require_tax_id);
    }

    #[test]
    fn unknown_applies_to_is_filtered() {
        let p = TaxProfile::from_json(
            r#"{"country":"GT","currency":"GTQ",
                "rates":[{"code":"x","rateBps":100,"appliesTo":"category"}]}"#,
        )
        .unwrap();
        assert_eq!(p.rates[0].applies_to, AppliesTo::Filtered);
    }

    #[test]
    fn rate_without_applies_to_is_rejected() {
        // Defaulting to `all` would tax untagged lines with the alcohol rate.
        let err = TaxProfile::from_json(
            r#"{"country":"GT","currency":"GTQ",
                "rates":[{"code":"alc","rateBps":800,"itemTagIn":["alcohol"]}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TaxError::Config(_)));
        assert!(err.to_string().contains("appliesTo"), "{err}");
    }

    #[test]
    fn filtered_rate_document_skips_untagged_lines() {
        let profile = TaxProfile::from_json(
            r#"{"country":"GT","currency":"GTQ",
                "rates":[{"code":"alc","rateBps":800,"appliesTo":"filtered","itemTagIn":["alcohol"]}]}"#,
        )
        .unwrap();
        let draft = OrderDraftBuilder::new(OrderType::DineIn)
            .add_line(LineBuilder::new("1", "Agua", 1, 1000).build())
            .add_line(LineBuilder::new("2", "Cerveza", 1, 1000).tag("alcohol").build())
            .build()
            .unwrap();
        let breakdown = crate::engine::calculate_breakdown(&draft, &profile).unwrap();
        assert_eq!(breakdown.lines[0].tax(), 0);
        assert_eq!(breakdown.lines[1].tax(), 80);
        assert_eq!(breakdown.snapshot.totals().tax, 80);
    }

    #[test]
    fn enum_codes_match_document_values() {
        for mode in [RoundingMode::HalfUp, RoundingMode::HalfEven] {
            assert_eq!(serde_json::to_string(&mode).unwrap(), format!("\"{}\"", mode.code()));
        }
        for order_type in [OrderType::DineIn, OrderType::Takeaway, OrderType::Delivery] {
            assert_eq!(
                serde_json::to_string(&order_type).unwrap(),
                format!("\"{}\"", order_type.code())
            );
        }
    }

    #[test]
    fn negative_rate_is_a_config_error() {
        let err = TaxProfile::from_json(
            r#"{"country":"GT","currency":"GTQ","rates":[{"code":"x","rateBps":-5,"appliesTo":"all"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, TaxError::Config(_)));
        assert!(err.to_string().contains("tax profile"));
    }

    #[test]
    fn profile_round_trips_through_json() {
        let p = TaxProfileBuilder::new("GT", "GTQ")
            .add_rate(TaxRateBuilder::new("iva", 1200).tags(["food"]).build())
            .add_jurisdiction(JurisdictionBuilder::new("z").zip_prefix("01").prices_include_tax(true).build())
            .build();
        let back = TaxProfile::from_json(&p.to_json().unwrap()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn draft_document() {
        let d = OrderDraft::from_json(
            r#"{
            "currency": "GTQ",
            "orderType": "delivery",
            "lines": [
                {"lineId": "1", "name": "Pupusas", "quantity": 3, "unitPriceMinorUnits": 800,
                 "optionsDeltaMinorUnits": 100, "category": "food", "tags": ["corn"]}
            ],
            "customer": {"taxId": "CF"},
            "deliveryFeeMinorUnits": 1500,
            "deliveryAddressInfo": {"country": "GT", "city": "Mixco", "zip": "01057"}
        }"#,
        )
        .unwrap();
        assert_eq!(d.order_type, OrderType::Delivery);
        assert_eq!(d.lines[0].gross_minor_units(), Some(2700));
        assert_eq!(d.delivery_address.unwrap().zip.as_deref(), Some("01057"));
    }

    #[test]
    fn snapshot_json_shape() {
        let snap = TaxSnapshot::zero("GTQ", &CustomerInfo::default());
        assert_eq!(
            snap.to_json().unwrap(),
            r#"{"currency":"GTQ","totals":{"subTotalCents":0,"taxCents":0,"grandTotalCents":0},"summaryByRate":[],"surcharges":[],"customer":{"taxId":null}}"#
        );
        assert_eq!(TaxSnapshot::from_json(&snap.to_json().unwrap()).unwrap(), snap);
    }
}
