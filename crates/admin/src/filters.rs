//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Formats a decimal amount as a dollar price.
///
/// Usage in templates: `{{ product.price|money }}`
#[askama::filter_fn]
pub fn money(amount: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let raw = amount.to_string();
    Ok(raw.parse::<rust_decimal::Decimal>().map_or_else(
        |_| format!("${raw}"),
        |value| format!("${:.2}", value.round_dp(2)),
    ))
}
