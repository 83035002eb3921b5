use iso_currency::Currency;
use num_format::{Locale, ToFormattedString as _};

/// Standard number decimal places for the given currency
/// (ex. JPY = 0, ARS = 2).
fn decimal_places(currency: Currency) -> usize {
    currency.exponent().unwrap_or(0) as usize
}

/// Format an amount with proper thousands separators and the currency's
/// number of decimal places (no currency symbol).
///
/// For consistency, uses en locale ('.' as decimal mark, i.e. 1,000.00)
/// regardless of user's locale or currency.
pub(crate) fn format_number(amount: f64, currency: Currency) -> String {
    let decimal_places = decimal_places(currency);
    let rounded = format!("{:.decimal_places$}", amount.abs());
    let (integer_part, fractional_part) = match rounded.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rounded.as_str(), None),
    };
    let integer_part = integer_part
        .parse::<u64>()
        .map(|i| i.to_formatted_string(&Locale::en))
        .unwrap_or_else(|_| integer_part.to_string());
    let sign = if amount < 0.0 && rounded.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match fractional_part {
        Some(f) => format!("{}{}.{}", sign, integer_part, f),
        None => format!("{}{}", sign, integer_part),
    }
}

/// Percentage without trailing zeros (0.3 -> "30%", 0.125 -> "12.5%").
pub(crate) fn format_pct(fraction: f64) -> String {
    let pct = format!("{:.2}", fraction * 100.0);
    let pct = pct.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", pct)
}
