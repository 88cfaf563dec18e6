//! Product wire type for the catalog API.
//!
//! Mirrors the JSON the backend serves. Decimal amounts travel as strings
//! on the wire; fields the backend may omit carry serde defaults so a
//! partial document still deserializes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ProductId;

/// A catalog product as served by `GET /api/products`.
///
/// Display-only on this side: all mutations go through the admin panel and
/// are re-fetched afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Current selling price.
    pub price: Decimal,
    /// Price before any markdown.
    pub original_price: Decimal,
    /// Flash-sale price, when one is active.
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    #[serde(default)]
    pub images: Vec<String>,
    /// Average review rating, 0.0 to 5.0.
    #[serde(default)]
    pub rating: f64,
    /// Number of reviews behind the rating.
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub available_sizes: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// The price a customer pays right now.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        self.discount_price.unwrap_or(self.price)
    }

    /// Whether the product is currently marked down.
    #[must_use]
    pub fn on_sale(&self) -> bool {
        self.discount_price
            .is_some_and(|d| d < self.original_price)
    }

    /// Markdown depth as a percentage of the original price.
    ///
    /// `None` when there is no active discount or the original price is
    /// zero (malformed upstream data).
    #[must_use]
    pub fn discount_percent(&self) -> Option<Decimal> {
        let discounted = self.discount_price?;
        if self.original_price.is_zero() || discounted >= self.original_price {
            return None;
        }
        let fraction = (self.original_price - discounted) / self.original_price;
        Some((fraction * Decimal::ONE_HUNDRED).round_dp(0))
    }

    /// Whether any stock remains.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(original: i64, discount: Option<i64>) -> Product {
        Product {
            id: ProductId::new(1),
            name: "Linen Shirt".to_string(),
            price: Decimal::new(original, 0),
            original_price: Decimal::new(original, 0),
            discount_price: discount.map(|d| Decimal::new(d, 0)),
            images: vec![],
            rating: 4.5,
            reviews: 12,
            material: "linen".to_string(),
            available_sizes: vec!["S".to_string(), "M".to_string()],
            stock: 3,
            color: "white".to_string(),
            category: "shirts".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        assert_eq!(product(100, Some(75)).effective_price(), Decimal::new(75, 0));
        assert_eq!(product(100, None).effective_price(), Decimal::new(100, 0));
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(
            product(100, Some(75)).discount_percent(),
            Some(Decimal::new(25, 0))
        );
        assert_eq!(product(100, None).discount_percent(), None);
        // Discount at or above the original price is not a markdown.
        assert_eq!(product(100, Some(100)).discount_percent(), None);
    }

    #[test]
    fn test_discount_percent_zero_original() {
        let mut p = product(0, Some(10));
        p.original_price = Decimal::ZERO;
        assert_eq!(p.discount_percent(), None);
    }

    #[test]
    fn test_deserialize_partial_document() {
        // A backend answer carrying only the required fields.
        let json = r#"{
            "id": 5,
            "name": "Wool Scarf",
            "price": "29.50",
            "originalPrice": "29.50"
        }"#;
        let p: Product = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, ProductId::new(5));
        assert!(p.images.is_empty());
        assert_eq!(p.stock, 0);
        assert!(p.created_at.is_none());
        assert!(!p.on_sale());
    }
}
