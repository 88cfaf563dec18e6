//! Shared types for Cedar Thread.
//!
//! This crate contains the vocabulary types used by both the storefront and
//! the admin binaries: newtype ids, money, order status, validated email
//! addresses, and the wire types for the external catalog API.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
