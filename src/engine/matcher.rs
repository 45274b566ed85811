//! Rate-rule matching for order lines.

use crate::core::{AppliesTo, OrderLineInput, OrderType, TaxRateRule};

/// All rules that apply to `line`, in declaration order.
///
/// Matching is non-exclusive: a line may pick up several rates (composite
/// taxes) or none. Exempt lines never match.
pub fn matching_rates<'a>(
    line: &OrderLineInput,
    order_type: OrderType,
    rates: &'a [TaxRateRule],
) -> Vec<&'a TaxRateRule> {
    if line.tax_exempt {
        return Vec::new();
    }
    rates
        .iter()
        .filter(|rule| rule_matches(rule, line, order_type))
        .collect()
}

/// Whether a single rule applies to a line.
///
/// `all` rules ignore filters. Otherwise every configured filter must pass;
/// an absent or empty filter list does not constrain.
pub fn rule_matches(rule: &TaxRateRule, line: &OrderLineInput, order_type: OrderType) -> bool {
    if rule.applies_to == AppliesTo::All {
        return true;
    }

    if let Some(categories) = configured(&rule.item_category_in) {
        let in_category = line
            .category
            .as_ref()
            .is_some_and(|c| categories.contains(c));
        if !in_category {
            return false;
        }
    }

    if let Some(tags) = configured(&rule.item_tag_in) {
        if !line.tags.iter().any(|t| tags.contains(t)) {
            return false;
        }
    }

    if let Some(excluded) = configured(&rule.exclude_item_tag_in) {
        if line.tags.iter().any(|t| excluded.contains(t)) {
            return false;
        }
    }

    if let Some(order_types) = configured(&rule.order_type_in) {
        if !order_types.contains(&order_type) {
            return false;
        }
    }

    true
}

fn configured<T>(filter: &Option<Vec<T>>) -> Option<&[T]> {
    filter.as_deref().filter(|values| !values.is_empty())
}
