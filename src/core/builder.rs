use super::error::TaxError;
use super::types::*;

/// Builder for a [`TaxProfile`].
///
/// ```
/// use tributo::core::*;
///
/// let profile = TaxProfileBuilder::new("GT", "GTQ")
///     .prices_include_tax(true)
///     .add_rate(TaxRateBuilder::new("iva", 1200).label("IVA").build())
///     .add_surcharge(SurchargeBuilder::new("service", 1000).label("Propina").build())
///     .build();
///
/// assert_eq!(profile.rates[0].rate_bps, 1200);
/// ```
pub struct TaxProfileBuilder {
    country: String,
    currency: String,
    prices_include_tax: bool,
    rounding: Option<RoundingMode>,
    rates: Vec<TaxRateRule>,
    surcharges: Vec<SurchargeRule>,
    delivery: DeliveryPolicy,
    jurisdictions: Vec<JurisdictionRule>,
    b2b: Option<B2bConfig>,
}

impl TaxProfileBuilder {
    pub fn new(country: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            currency: currency.into(),
            prices_include_tax: false,
            rounding: None,
            rates: Vec::new(),
            surcharges: Vec::new(),
            delivery: DeliveryPolicy::default(),
            jurisdictions: Vec::new(),
            b2b: None,
        }
    }

    pub fn prices_include_tax(mut self, inclusive: bool) -> Self {
        self.prices_include_tax = inclusive;
        self
    }

    pub fn rounding(mut self, mode: RoundingMode) -> Self {
        self.rounding = Some(mode);
        self
    }

    pub fn add_rate(mut self, rate: TaxRateRule) -> Self {
        self.rates.push(rate);
        self
    }

    pub fn add_surcharge(mut self, surcharge: SurchargeRule) -> Self {
        self.surcharges.push(surcharge);
        self
    }

    pub fn delivery(mut self, policy: DeliveryPolicy) -> Self {
        self.delivery = policy;
        self
    }

    pub fn add_jurisdiction(mut self, jurisdiction: JurisdictionRule) -> Self {
        self.jurisdictions.push(jurisdiction);
        self
    }

    pub fn b2b(mut self, enabled: bool, require_tax_id: bool) -> Self {
        self.b2b = Some(B2bConfig {
            enabled,
            require_tax_id,
        });
        self
    }

    pub fn build(self) -> TaxProfile {
        TaxProfile {
            country: self.country,
            currency: self.currency,
            prices_include_tax: self.prices_include_tax,
            rounding: self.rounding,
            rates: self.rates,
            surcharges: self.surcharges,
            delivery: self.delivery,
            jurisdictions: self.jurisdictions,
            b2b: self.b2b,
        }
    }
}

/// Builder for a [`TaxRateRule`].
///
/// Starts as an `all` rule; setting any filter turns it into a filtered one.
pub struct TaxRateBuilder {
    code: String,
    label: String,
    rate_bps: u32,
    applies_to: AppliesTo,
    item_category_in: Option<Vec<String>>,
    item_tag_in: Option<Vec<String>>,
    exclude_item_tag_in: Option<Vec<String>>,
    order_type_in: Option<Vec<OrderType>>,
}

impl TaxRateBuilder {
    pub fn new(code: impl Into<String>, rate_bps: u32) -> Self {
        Self {
            code: code.into(),
            label: String::new(),
            rate_bps,
            applies_to: AppliesTo::All,
            item_category_in: None,
            item_tag_in: None,
            exclude_item_tag_in: None,
            order_type_in: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = AppliesTo::Filtered;
        self.item_category_in = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = AppliesTo::Filtered;
        self.item_tag_in = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.applies_to = AppliesTo::Filtered;
        self.exclude_item_tag_in = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn order_types(mut self, order_types: impl IntoIterator<Item = OrderType>) -> Self {
        self.applies_to = AppliesTo::Filtered;
        self.order_type_in = Some(order_types.into_iter().collect());
        self
    }

    /// Force `appliesTo`; `All` keeps any filters but ignores them.
    pub fn applies_to(mut self, applies_to: AppliesTo) -> Self {
        self.applies_to = applies_to;
        self
    }

    pub fn build(self) -> TaxRateRule {
        TaxRateRule {
            code: self.code,
            label: self.label,
            rate_bps: self.rate_bps,
            applies_to: self.applies_to,
            item_category_in: self.item_category_in,
            item_tag_in: self.item_tag_in,
            exclude_item_tag_in: self.exclude_item_tag_in,
            order_type_in: self.order_type_in,
        }
    }
}

/// Builder for a [`SurchargeRule`].
pub struct SurchargeBuilder {
    code: String,
    label: String,
    percent_bps: u32,
    apply_when_order_type_in: Option<Vec<OrderType>>,
    taxable: bool,
    tax_code: Option<String>,
}

impl SurchargeBuilder {
    pub fn new(code: impl Into<String>, percent_bps: u32) -> Self {
        Self {
            code: code.into(),
            label: String::new(),
            percent_bps,
            apply_when_order_type_in: None,
            taxable: false,
            tax_code: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn order_types(mut self, order_types: impl IntoIterator<Item = OrderType>) -> Self {
        self.apply_when_order_type_in = Some(order_types.into_iter().collect());
        self
    }

    /// Mark the surcharge taxable under the rate `tax_code`.
    pub fn taxable(mut self, tax_code: impl Into<String>) -> Self {
        self.taxable = true;
        self.tax_code = Some(tax_code.into());
        self
    }

    pub fn build(self) -> SurchargeRule {
        SurchargeRule {
            code: self.code,
            label: self.label,
            percent_bps: self.percent_bps,
            apply_when_order_type_in: self.apply_when_order_type_in,
            taxable: self.taxable,
            tax_code: self.tax_code,
        }
    }
}

impl DeliveryPolicy {
    /// Fee handled by the caller, outside the snapshot.
    pub fn out_of_scope() -> Self {
        Self::default()
    }

    /// Fee folded into the snapshot as an untaxed line.
    pub fn exempt_line() -> Self {
        Self {
            mode: DeliveryMode::AsLine,
            taxable: false,
            tax_code: None,
        }
    }

    /// Fee folded into the snapshot as a line taxed by exactly `tax_code`.
    pub fn taxable_line(tax_code: impl Into<String>) -> Self {
        Self {
            mode: DeliveryMode::AsLine,
            taxable: true,
            tax_code: Some(tax_code.into()),
        }
    }
}

/// Builder for a [`JurisdictionRule`].
pub struct JurisdictionBuilder {
    code: String,
    matcher: JurisdictionMatch,
    rates_override: Option<Vec<TaxRateRule>>,
    surcharges_override: Option<Vec<SurchargeRule>>,
    delivery_override: Option<DeliveryPolicy>,
    prices_include_tax_override: Option<bool>,
    rounding_override: Option<RoundingMode>,
}

impl JurisdictionBuilder {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            matcher: JurisdictionMatch::default(),
            rates_override: None,
            surcharges_override: None,
            delivery_override: None,
            prices_include_tax_override: None,
            rounding_override: None,
        }
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.matcher.country = Some(country.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.matcher.state = Some(state.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.matcher.city = Some(city.into());
        self
    }

    pub fn zip_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.matcher.zip_prefix = Some(prefix.into());
        self
    }

    pub fn rates(mut self, rates: Vec<TaxRateRule>) -> Self {
        self.rates_override = Some(rates);
        self
    }

    pub fn surcharges(mut self, surcharges: Vec<SurchargeRule>) -> Self {
        self.surcharges_override = Some(surcharges);
        self
    }

    pub fn delivery(mut self, policy: DeliveryPolicy) -> Self {
        self.delivery_override = Some(policy);
        self
    }

    pub fn prices_include_tax(mut self, inclusive: bool) -> Self {
        self.prices_include_tax_override = Some(inclusive);
        self
    }

    pub fn rounding(mut self, mode: RoundingMode) -> Self {
        self.rounding_override = Some(mode);
        self
    }

    pub fn build(self) -> JurisdictionRule {
        JurisdictionRule {
            code: self.code,
            matcher: self.matcher,
            rates_override: self.rates_override,
            surcharges_override: self.surcharges_override,
            delivery_override: self.delivery_override,
            prices_include_tax_override: self.prices_include_tax_override,
            rounding_override: self.rounding_override,
        }
    }
}

/// Builder for an [`Address`].
pub struct AddressBuilder {
    country: String,
    state: Option<String>,
    city: Option<String>,
    zip: Option<String>,
}

impl AddressBuilder {
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            state: None,
            city: None,
            zip: None,
        }
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn zip(mut self, zip: impl Into<String>) -> Self {
        self.zip = Some(zip.into());
        self
    }

    pub fn build(self) -> Address {
        Address {
            country: self.country,
            state: self.state,
            city: self.city,
            zip: self.zip,
        }
    }
}

/// Builder for an [`OrderLineInput`].
pub struct LineBuilder {
    line_id: String,
    name: String,
    quantity: i64,
    unit_price_minor_units: i64,
    addons_minor_units: i64,
    options_delta_minor_units: i64,
    line_total_minor_units: Option<i64>,
    tax_exempt: bool,
    category: Option<String>,
    tags: Vec<String>,
}

impl LineBuilder {
    pub fn new(
        line_id: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        unit_price_minor_units: i64,
    ) -> Self {
        Self {
            line_id: line_id.into(),
            name: name.into(),
            quantity,
            unit_price_minor_units,
            addons_minor_units: 0,
            options_delta_minor_units: 0,
            line_total_minor_units: None,
            tax_exempt: false,
            category: None,
            tags: Vec::new(),
        }
    }

    pub fn addons(mut self, minor_units: i64) -> Self {
        self.addons_minor_units = minor_units;
        self
    }

    pub fn options_delta(mut self, minor_units: i64) -> Self {
        self.options_delta_minor_units = minor_units;
        self
    }

    pub fn line_total(mut self, minor_units: i64) -> Self {
        self.line_total_minor_units = Some(minor_units);
        self
    }

    pub fn tax_exempt(mut self) -> Self {
        self.tax_exempt = true;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn build(self) -> OrderLineInput {
        OrderLineInput {
            line_id: self.line_id,
            name: self.name,
            quantity: self.quantity,
            unit_price_minor_units: self.unit_price_minor_units,
            addons_minor_units: self.addons_minor_units,
            options_delta_minor_units: self.options_delta_minor_units,
            line_total_minor_units: self.line_total_minor_units,
            tax_exempt: self.tax_exempt,
            category: self.category,
            tags: self.tags,
        }
    }
}

/// Builder for an [`OrderDraft`].
pub struct OrderDraftBuilder {
    currency: String,
    order_type: OrderType,
    lines: Vec<OrderLineInput>,
    customer: CustomerInfo,
    delivery_fee_minor_units: i64,
    delivery_address: Option<Address>,
}

impl OrderDraftBuilder {
    pub fn new(order_type: OrderType) -> Self {
        Self {
            currency: String::new(),
            order_type,
            lines: Vec::new(),
            customer: CustomerInfo::default(),
            delivery_fee_minor_units: 0,
            delivery_address: None,
        }
    }

    pub fn currency(mut self, code: impl Into<String>) -> Self {
        self.currency = code.into();
        self
    }

    pub fn add_line(mut self, line: OrderLineInput) -> Self {
        self.lines.push(line);
        self
    }

    pub fn customer_tax_id(mut self, tax_id: impl Into<String>) -> Self {
        self.customer.tax_id = Some(tax_id.into());
        self
    }

    pub fn customer_name(mut self, name: impl Into<String>) -> Self {
        self.customer.name = Some(name.into());
        self
    }

    pub fn delivery_fee(mut self, minor_units: i64) -> Self {
        self.delivery_fee_minor_units = minor_units;
        self
    }

    pub fn delivery_address(mut self, address: Address) -> Self {
        self.delivery_address = Some(address);
        self
    }

    /// Build the draft. Structural checks on amounts happen at calculation time.
    pub fn build(self) -> Result<OrderDraft, TaxError> {
        // A POS cart never approaches these; larger drafts are malformed.
        if self.lines.len() > 10_000 {
            return Err(TaxError::Builder(
                "order cannot have more than 10,000 lines".into(),
            ));
        }
        if self.currency.len() > 3 {
            return Err(TaxError::Builder(
                "currency must be an ISO 4217 code".into(),
            ));
        }

        Ok(OrderDraft {
            currency: self.currency,
            order_type: self.order_type,
            lines: self.lines,
            customer: self.customer,
            delivery_fee_minor_units: self.delivery_fee_minor_units,
            delivery_address: self.delivery_address,
        })
    }
}
