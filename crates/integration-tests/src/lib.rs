//! Integration tests for the cadastro registry API.
//!
//! The tests in `tests/` run against a live server and the real ViaCEP
//! service, so they are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, then the server
//! cargo run -p cadastro-server
//!
//! # Run the live tests
//! cargo test -p cadastro-integration-tests -- --ignored
//! ```
//!
//! The target server is taken from `CADASTRO_BASE_URL` and defaults to
//! `http://localhost:3000`.

use reqwest::Client;
use uuid::Uuid;

/// Base URL for the registry API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CADASTRO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// HTTP client for test requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A customer name that will not collide with earlier test runs.
///
/// Duplicate detection keys on the (name, CPF) pair, so a unique name
/// lets every run reuse the same fixture CPF.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4())
}
