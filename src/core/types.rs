use serde::{Deserialize, Serialize};

/// Tax configuration for one restaurant (or one tenant of the suite).
///
/// Authored in an external configuration store; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxProfile {
    /// ISO 3166-1 alpha-2 country of the seller (e.g. "GT").
    pub country: String,
    /// ISO 4217 currency code all amounts are expressed in.
    pub currency: String,
    /// Whether menu prices already contain tax.
    #[serde(default)]
    pub prices_include_tax: bool,
    /// Rounding applied to every per-line-per-rate computation.
    /// Missing means [`RoundingMode::HalfUp`].
    #[serde(default)]
    pub rounding: Option<RoundingMode>,
    /// Rate rules in declaration order.
    #[serde(default)]
    pub rates: Vec<TaxRateRule>,
    /// Surcharge rules in declaration order.
    #[serde(default)]
    pub surcharges: Vec<SurchargeRule>,
    /// How the delivery fee is treated.
    #[serde(default)]
    pub delivery: DeliveryPolicy,
    /// Geographic overrides, matched against the delivery address.
    #[serde(default)]
    pub jurisdictions: Vec<JurisdictionRule>,
    /// Business-to-business invoicing configuration.
    #[serde(default)]
    pub b2b: Option<B2bConfig>,
}

/// Rounding strategy for a single tax computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// .5 rounds away from zero (commercial rounding).
    #[default]
    HalfUp,
    /// .5 rounds to the nearest even minor unit (banker's rounding).
    HalfEven,
}

impl RoundingMode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::HalfUp => "half_up",
            Self::HalfEven => "half_even",
        }
    }
}

/// A tax rate and the lines it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRateRule {
    /// Stable identifier, echoed in the snapshot summary (e.g. "std", "iva").
    pub code: String,
    /// Human-readable label for receipts.
    #[serde(default)]
    pub label: String,
    /// Rate in basis points (1200 = 12%).
    pub rate_bps: u32,
    /// `all` ignores every filter below. Required in documents.
    pub applies_to: AppliesTo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_category_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_tag_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_item_tag_in: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_type_in: Option<Vec<OrderType>>,
}

/// Scope selector of a [`TaxRateRule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppliesTo {
    /// Every non-exempt line.
    All,
    /// Only lines passing the rule's filters.
    #[serde(other)]
    Filtered,
}

/// Percentage-based order surcharge (service charge, packaging fee, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurchargeRule {
    pub code: String,
    #[serde(default)]
    pub label: String,
    /// Percentage of the line bases in basis points (1000 = 10%).
    pub percent_bps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_when_order_type_in: Option<Vec<OrderType>>,
    /// Whether the surcharge itself is taxed.
    #[serde(default)]
    pub taxable: bool,
    /// Rate code used when `taxable` (references [`TaxRateRule::code`]).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
}

/// Treatment of the delivery fee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryPolicy {
    #[serde(default)]
    pub mode: DeliveryMode,
    #[serde(default)]
    pub taxable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_code: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// The fee becomes a synthetic order line inside the snapshot.
    AsLine,
    /// The caller adds the fee outside the snapshot.
    #[default]
    OutOfScope,
}

/// Geographic override of a base profile.
///
/// Every `*_override` field replaces the base field wholesale when set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurisdictionRule {
    pub code: String,
    #[serde(rename = "match")]
    pub matcher: JurisdictionMatch,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rates_override: Option<Vec<TaxRateRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub surcharges_override: Option<Vec<SurchargeRule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_override: Option<DeliveryPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices_include_tax_override: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding_override: Option<RoundingMode>,
}

/// Address criteria of a [`JurisdictionRule`]. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JurisdictionMatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_prefix: Option<String>,
}

impl JurisdictionMatch {
    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.zip_prefix.is_none()
    }
}

/// Business-to-business invoicing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct B2bConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Invoices may only be issued for snapshots carrying a customer tax ID.
    #[serde(default)]
    pub require_tax_id: bool,
}

/// Service channel of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    DineIn,
    Takeaway,
    Delivery,
}

impl OrderType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::DineIn => "dine_in",
            Self::Takeaway => "takeaway",
            Self::Delivery => "delivery",
        }
    }
}

/// Postal address used for jurisdiction matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// ISO 3166-1 alpha-2 country code.
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
}

/// Canonical cart line. Legacy shapes are normalised before reaching the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineInput {
    pub line_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: i64,
    #[serde(default)]
    pub unit_price_minor_units: i64,
    #[serde(default)]
    pub addons_minor_units: i64,
    /// Per-unit price delta of selected options.
    #[serde(default)]
    pub options_delta_minor_units: i64,
    /// Explicit gross total; takes precedence over the computed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_total_minor_units: Option<i64>,
    #[serde(default)]
    pub tax_exempt: bool,
    /// Menu category, matched by `itemCategoryIn`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Menu tags, matched by `itemTagIn` / `excludeItemTagIn`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl OrderLineInput {
    /// Gross amount of the line in minor units, `None` on overflow.
    ///
    /// An explicit `line_total_minor_units` wins; otherwise
    /// `unit_price × qty + addons + options_delta × qty`.
    pub fn gross_minor_units(&self) -> Option<i64> {
        if let Some(total) = self.line_total_minor_units {
            return Some(total);
        }
        let items = self.unit_price_minor_units.checked_mul(self.quantity)?;
        let options = self.options_delta_minor_units.checked_mul(self.quantity)?;
        items
            .checked_add(self.addons_minor_units)?
            .checked_add(options)
    }
}

/// Customer data relevant to tax documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Order as assembled by the checkout flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// ISO 4217 code. Empty means the profile currency.
    #[serde(default)]
    pub currency: String,
    pub order_type: OrderType,
    #[serde(default)]
    pub lines: Vec<OrderLineInput>,
    #[serde(default)]
    pub customer: CustomerInfo,
    #[serde(default)]
    pub delivery_fee_minor_units: i64,
    #[serde(default, rename = "deliveryAddressInfo", skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
}

/// Persisted result of one tax calculation.
///
/// Field names are a stable contract with receipts, reports and invoice
/// issuance. A snapshot is never edited: fields are private and only
/// readable through accessors. Corrections require a new order or a credit note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSnapshot {
    pub(crate) currency: String,
    pub(crate) totals: SnapshotTotals,
    pub(crate) summary_by_rate: Vec<RateSummary>,
    pub(crate) surcharges: Vec<SurchargeSummary>,
    pub(crate) customer: SnapshotCustomer,
}

impl TaxSnapshot {
    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn totals(&self) -> &SnapshotTotals {
        &self.totals
    }

    pub fn summary_by_rate(&self) -> &[RateSummary] {
        &self.summary_by_rate
    }

    pub fn surcharges(&self) -> &[SurchargeSummary] {
        &self.surcharges
    }

    pub fn customer(&self) -> &SnapshotCustomer {
        &self.customer
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotTotals {
    #[serde(rename = "subTotalCents")]
    pub sub_total: i64,
    #[serde(rename = "taxCents")]
    pub tax: i64,
    #[serde(rename = "grandTotalCents")]
    pub grand_total: i64,
}

/// Tax collected under one rate code (lines and surcharges combined).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RateSummary {
    pub code: String,
    #[serde(rename = "rateBps")]
    pub rate_bps: u32,
    #[serde(rename = "taxCents")]
    pub tax: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurchargeSummary {
    #[serde(rename = "baseCents")]
    pub base: i64,
    #[serde(rename = "taxCents")]
    pub tax: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotCustomer {
    #[serde(rename = "taxId")]
    pub tax_id: Option<String>,
}
