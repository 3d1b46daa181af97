//! Request ID middleware for request tracing and correlation.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware that tags every request with a unique request ID.
///
/// An `x-request-id` header supplied by an upstream proxy is kept;
/// otherwise a new UUID v4 is generated. The ID is recorded in the
/// current tracing span, set as a Sentry tag for error correlation,
/// and echoed back in the response headers.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_or_new(request.headers());

    Span::current().record("request_id", &request_id);

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}

/// Take the inbound request ID or mint a fresh one.
fn incoming_or_new(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_header_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(incoming_or_new(&headers), "abc-123");
    }

    #[test]
    fn test_missing_header_generates_uuid() {
        let headers = HeaderMap::new();
        let id = incoming_or_new(&headers);
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
