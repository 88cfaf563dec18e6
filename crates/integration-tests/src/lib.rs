//! Integration tests for Cedar Thread.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and the servers
//! cargo run -p cedar-thread-cli -- migrate storefront
//! cargo run -p cedar-thread-storefront &
//! cargo run -p cedar-thread-admin &
//!
//! # Run integration tests against the live servers
//! cargo test -p cedar-thread-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront` - Storefront page and badge-fragment tests
//! - `admin` - Admin product CRUD tests
//!
//! All tests are `#[ignore]`d by default because they require running
//! servers and a reachable catalog backend.

/// Base URL for the storefront (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin panel (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Create an HTTP client that keeps its session cookie.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn session_client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
