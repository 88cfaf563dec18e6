//! Types stored in the client-state store.
//!
//! These travel as JSON under the `user`, `cart`, and `wishlist` keys.
//! Decoding is tolerant: anything that does not parse degrades to the key
//! default rather than failing a render, so a stale or hand-edited entry
//! can never take a page down.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use cedar_thread_core::{Email, ProductId};

/// The signed-in user, as issued by the backend at login.
///
/// Opaque to the store layer; presence/absence is the only invariant this
/// codebase checks. The `token` is the bearer credential for the order
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl StoredUser {
    /// Decode a stored `user` value. `None` for null or malformed entries.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        if value.is_null() {
            return None;
        }
        match serde_json::from_value(value.clone()) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!(error = %e, "unreadable stored user, treating as signed out");
                None
            }
        }
    }

    /// Name to greet the user with.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.first_name.as_deref().unwrap_or(&self.name)
    }
}

/// One line in the stored cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl CartEntry {
    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

const fn default_quantity() -> u32 {
    1
}

/// One entry in the stored wishlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
}

/// Decode a stored `cart` value; malformed input yields an empty list.
#[must_use]
pub fn cart_entries(value: &Value) -> Vec<CartEntry> {
    decode_list(value, "cart")
}

/// Decode a stored `wishlist` value; malformed input yields an empty list.
#[must_use]
pub fn wishlist_entries(value: &Value) -> Vec<WishlistEntry> {
    decode_list(value, "wishlist")
}

fn decode_list<T: serde::de::DeserializeOwned>(value: &Value, key: &str) -> Vec<T> {
    match serde_json::from_value(value.clone()) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(key, error = %e, "unreadable stored list, treating as empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_stored_user_roundtrip() {
        let user = StoredUser {
            name: "Ada Lovelace".to_string(),
            email: Email::parse("ada@example.com").unwrap(),
            image: None,
            token: Some("tok-123".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["firstName"], "Ada");

        let decoded = StoredUser::from_value(&value).unwrap();
        assert_eq!(decoded.email, user.email);
        assert_eq!(decoded.display_name(), "Ada");
    }

    #[test]
    fn test_stored_user_null_and_malformed() {
        assert!(StoredUser::from_value(&Value::Null).is_none());
        assert!(StoredUser::from_value(&json!({ "name": 42 })).is_none());
        assert!(StoredUser::from_value(&json!("just a string")).is_none());
    }

    #[test]
    fn test_stored_user_minimal_document() {
        let user =
            StoredUser::from_value(&json!({ "name": "Sam", "email": "sam@example.com" })).unwrap();
        assert!(user.token.is_none());
        assert_eq!(user.display_name(), "Sam");
    }

    #[test]
    fn test_cart_entries_quantity_defaults_to_one() {
        let entries = cart_entries(&json!([
            { "productId": 1, "name": "Shirt", "price": "39.00", "quantity": 2 },
            { "productId": 2, "name": "Scarf", "price": "12.00" }
        ]));
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].quantity, 2);
        assert_eq!(entries[1].quantity, 1);
        assert_eq!(entries[0].line_total(), Decimal::new(7800, 2));
    }

    #[test]
    fn test_malformed_lists_decode_empty() {
        assert!(cart_entries(&json!({ "not": "a list" })).is_empty());
        assert!(wishlist_entries(&json!([{ "productId": "nope" }])).is_empty());
        assert!(cart_entries(&Value::Null).is_empty());
    }
}
