//! Parsing of free-text answers (price range, maximum distance).

use super::criteria::PriceRange;
use crate::domain::foundation::ValidationError;

/// Splits `text` on whitespace and parses every word as a number, accepting
/// a comma as decimal separator. Any unparseable word yields an empty list.
pub fn parse_numbers(text: &str) -> Vec<f64> {
    let parsed: Option<Vec<f64>> = text
        .replace(',', ".")
        .split_whitespace()
        .map(|word| word.parse::<f64>().ok().filter(|n| n.is_finite()))
        .collect();
    parsed.unwrap_or_default()
}

/// Two numbers in any order, e.g. `"150 20,5"`.
///
/// # Errors
///
/// `InvalidFormat` unless exactly two non-negative numbers are given.
pub fn parse_price_range(text: &str) -> Result<PriceRange, ValidationError> {
    match parse_numbers(text).as_slice() {
        [a, b] => PriceRange::new(*a, *b),
        _ => Err(ValidationError::invalid_format(
            "price_range",
            "expected two numbers separated by a space",
        )),
    }
}

/// One positive number of kilometres.
///
/// # Errors
///
/// `InvalidFormat` unless exactly one positive number is given.
pub fn parse_distance(text: &str) -> Result<f64, ValidationError> {
    match parse_numbers(text).as_slice() {
        [d] if *d > 0.0 => Ok(*d),
        _ => Err(ValidationError::invalid_format(
            "max_distance",
            "expected one positive number",
        )),
    }
}
