//! Jurisdiction selection and override merging.

use std::cmp::Reverse;

use crate::core::{
    Address, B2bConfig, DeliveryPolicy, JurisdictionMatch, JurisdictionRule, RoundingMode,
    SurchargeRule, TaxProfile, TaxRateRule,
};

/// A base profile with at most one jurisdiction's overrides applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveProfile {
    pub country: String,
    pub currency: String,
    pub prices_include_tax: bool,
    pub rounding: RoundingMode,
    pub rates: Vec<TaxRateRule>,
    pub surcharges: Vec<SurchargeRule>,
    pub delivery: DeliveryPolicy,
    pub b2b: Option<B2bConfig>,
    /// Code of the jurisdiction whose overrides were applied.
    pub jurisdiction: Option<String>,
}

/// How specific a jurisdiction match is. Higher wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Specificity {
    Country,
    State,
    City,
    ZipPrefix,
}

impl EffectiveProfile {
    /// Merge the most specific jurisdiction matching `address` into `profile`.
    ///
    /// Without an address, or when nothing matches, the base profile is used
    /// unchanged.
    pub fn resolve(profile: &TaxProfile, address: Option<&Address>) -> Self {
        let jurisdiction = address.and_then(|a| select_jurisdiction(&profile.jurisdictions, a));
        match jurisdiction {
            Some(j) => tracing::debug!(jurisdiction = %j.code, "applying jurisdiction override"),
            None => tracing::trace!("no jurisdiction override"),
        }
        Self::merge(profile, jurisdiction)
    }

    /// Each override replaces its base field wholesale; unset overrides fall
    /// back to the base. Lists are never merged element by element.
    pub fn merge(base: &TaxProfile, jurisdiction: Option<&JurisdictionRule>) -> Self {
        let rates = jurisdiction
            .and_then(|j| j.rates_override.as_ref())
            .unwrap_or(&base.rates);
        let surcharges = jurisdiction
            .and_then(|j| j.surcharges_override.as_ref())
            .unwrap_or(&base.surcharges);
        let delivery = jurisdiction
            .and_then(|j| j.delivery_override.as_ref())
            .unwrap_or(&base.delivery);
        let prices_include_tax = jurisdiction
            .and_then(|j| j.prices_include_tax_override)
            .unwrap_or(base.prices_include_tax);
        let rounding = jurisdiction
            .and_then(|j| j.rounding_override)
            .or(base.rounding)
            .unwrap_or_default();

        Self {
            country: base.country.clone(),
            currency: base.currency.clone(),
            prices_include_tax,
            rounding,
            rates: rates.clone(),
            surcharges: surcharges.clone(),
            delivery: delivery.clone(),
            b2b: base.b2b.clone(),
            jurisdiction: jurisdiction.map(|j| j.code.clone()),
        }
    }

    /// Look up a rate by code. The first declaration wins.
    pub fn rate(&self, code: &str) -> Option<&TaxRateRule> {
        self.rates.iter().find(|r| r.code == code)
    }
}

/// Pick the single most specific rule matching `address`.
/// Ties go to the earliest declaration.
pub fn select_jurisdiction<'a>(
    rules: &'a [JurisdictionRule],
    address: &Address,
) -> Option<&'a JurisdictionRule> {
    rules
        .iter()
        .enumerate()
        .filter_map(|(i, rule)| {
            match_specificity(&rule.matcher, address).map(|spec| (spec, Reverse(i), rule))
        })
        .max_by_key(|(spec, order, _)| (*spec, *order))
        .map(|(_, _, rule)| rule)
}

/// Specificity of `criteria` if every criterion it sets matches `address`.
///
/// An empty criteria set never matches.
pub fn match_specificity(criteria: &JurisdictionMatch, address: &Address) -> Option<Specificity> {
    let mut specificity = None;

    if let Some(country) = &criteria.country {
        if !eq_trimmed_ignore_case(country, &address.country) {
            return None;
        }
        specificity = Some(Specificity::Country);
    }
    if let Some(state) = &criteria.state {
        if !address
            .state
            .as_deref()
            .is_some_and(|s| eq_trimmed_ignore_case(state, s))
        {
            return None;
        }
        specificity = Some(Specificity::State);
    }
    if let Some(city) = &criteria.city {
        if !address
            .city
            .as_deref()
            .is_some_and(|c| eq_trimmed_ignore_case(city, c))
        {
            return None;
        }
        specificity = Some(Specificity::City);
    }
    if let Some(prefix) = &criteria.zip_prefix {
        let prefix = prefix.trim();
        if prefix.is_empty()
            || !address
                .zip
                .as_deref()
                .is_some_and(|z| z.trim().starts_with(prefix))
        {
            return None;
        }
        specificity = Some(Specificity::ZipPrefix);
    }

    specificity
}

fn eq_trimmed_ignore_case(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}
