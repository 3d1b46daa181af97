//! HTTP route handlers for the registry API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health           - Liveness check
//! GET    /health/ready     - Readiness check (verifies the database)
//!
//! # Customers
//! GET    /customers        - List all customers
//! POST   /customers        - Register a customer
//! GET    /customers/{id}   - Fetch one customer
//! PUT    /customers/{id}   - Replace a customer
//! DELETE /customers/{id}   - Remove a customer
//! ```

pub mod customers;

use axum::{Router, extract::State, http::StatusCode, routing::get};

use crate::state::AppState;

/// Create the customer routes router.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::index).post(customers::create))
        .route(
            "/{id}",
            get(customers::show)
                .put(customers::update)
                .delete(customers::remove),
        )
}

/// Create all routes for the registry API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/customers", customer_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.customers().ping().await {
        Ok(()) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
