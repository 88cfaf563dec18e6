//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a decimal amount as a dollar price.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format_money(&amount.to_string()))
}

fn format_money(raw: &str) -> String {
    raw.parse::<rust_decimal::Decimal>().map_or_else(
        |_| format!("${raw}"),
        |value| format!("${:.2}", value.round_dp(2)),
    )
}

#[cfg(test)]
mod tests {
    use super::format_money;

    #[test]
    fn test_format_money_two_places() {
        assert_eq!(format_money("19.99"), "$19.99");
        assert_eq!(format_money("25"), "$25.00");
        assert_eq!(format_money("7.5"), "$7.50");
    }

    #[test]
    fn test_format_money_passes_through_non_numeric() {
        assert_eq!(format_money("n/a"), "$n/a");
    }
}
