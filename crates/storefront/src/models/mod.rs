//! Storefront data models.

pub mod client;

pub use client::{CartEntry, StoredUser, WishlistEntry, cart_entries, wishlist_entries};
