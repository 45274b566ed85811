//! ISO 4217 currency codes and their minor-unit exponents.
//!
//! The engine itself only handles integer minor units; this table is what
//! receipts and reports need to render them, and what the profile linter
//! uses to reject unknown currencies.

use rust_decimal::Decimal;

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    minor_unit_exponent(code).is_some()
}

/// Number of decimal places of the currency's minor unit (2 for USD, 0 for JPY).
pub fn minor_unit_exponent(code: &str) -> Option<u32> {
    CURRENCIES
        .binary_search_by(|(c, _)| (*c).cmp(code))
        .ok()
        .map(|i| CURRENCIES[i].1)
}

/// Convert an amount in minor units to major units for display.
///
/// `to_major_units(536, "GTQ") == Some(dec!(5.36))`
pub fn to_major_units(minor: i64, code: &str) -> Option<Decimal> {
    minor_unit_exponent(code).map(|exp| Decimal::new(minor, exp))
}

/// Sorted for binary search.
static CURRENCIES: &[(&str, u32)] = &[
    ("AED", 2), // UAE Dirham
    ("ARS", 2), // Argentine Peso
    ("AUD", 2), // Australian Dollar
    ("BHD", 3), // Bahraini Dinar
    ("BOB", 2), // Boliviano
    ("BRL", 2), // Brazilian Real
    ("CAD", 2), // Canadian Dollar
    ("CHF", 2), // Swiss Franc
    ("CLP", 0), // Chilean Peso
    ("CNY", 2), // Chinese Yuan
    ("COP", 2), // Colombian Peso
    ("CRC", 2), // Costa Rican Colon
    ("CZK", 2), // Czech Koruna
    ("DKK", 2), // Danish Krone
    ("DOP", 2), // Dominican Peso
    ("EUR", 2), // Euro
    ("GBP", 2), // Pound Sterling
    ("GTQ", 2), // Guatemalan Quetzal
    ("HKD", 2), // Hong Kong Dollar
    ("HNL", 2), // Honduran Lempira
    ("HUF", 2), // Hungarian Forint
    ("IDR", 2), // Indonesian Rupiah
    ("ILS", 2), // Israeli Shekel
    ("INR", 2), // Indian Rupee
    ("ISK", 0), // Icelandic Krona
    ("JOD", 3), // Jordanian Dinar
    ("JPY", 0), // Japanese Yen
    ("KRW", 0), // South Korean Won
    ("KWD", 3), // Kuwaiti Dinar
    ("MXN", 2), // Mexican Peso
    ("MYR", 2), // Malaysian Ringgit
    ("NIO", 2), // Nicaraguan Cordoba
    ("NOK", 2), // Norwegian Krone
    ("NZD", 2), // New Zealand Dollar
    ("OMR", 3), // Omani Rial
    ("PAB", 2), // Panamanian Balboa
    ("PEN", 2), // Peruvian Sol
    ("PHP", 2), // Philippine Peso
    ("PLN", 2), // Polish Zloty
    ("PYG", 0), // Paraguayan Guarani
    ("SAR", 2), // Saudi Riyal
    ("SEK", 2), // Swedish Krona
    ("SGD", 2), // Singapore Dollar
    ("THB", 2), // Thai Baht
    ("TND", 3), // Tunisian Dinar
    ("TRY", 2), // Turkish Lira
    ("TWD", 2), // New Taiwan Dollar
    ("UAH", 2), // Ukrainian Hryvnia
    ("USD", 2), // US Dollar
    ("UYU", 2), // Uruguayan Peso
    ("VND", 0), // Vietnamese Dong
    ("ZAR", 2), // South African Rand
];
