//! HTTP middleware stack for the registry API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)

pub mod request_id;

pub use request_id::request_id_middleware;
