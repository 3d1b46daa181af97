//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors
//! to Sentry before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::ServiceError;
use crate::viacep::LookupError;

/// Application-level error type for the registry API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Customer service operation failed.
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(
            self,
            Self::Service(
                ServiceError::Store(_)
                    | ServiceError::Lookup(
                        LookupError::Http(_) | LookupError::Api { .. } | LookupError::Parse(_)
                    )
            )
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Service(err) => match err {
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::InvalidTaxId(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Duplicate { .. } => StatusCode::CONFLICT,
                ServiceError::Lookup(err) => match err {
                    LookupError::InvalidPostalCode(_) | LookupError::UnknownPostalCode(_) => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    LookupError::Http(_) | LookupError::Api { .. } | LookupError::Parse(_) => {
                        StatusCode::BAD_GATEWAY
                    }
                },
                ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Service(err) => match err {
                ServiceError::Store(_) => "Internal server error".to_string(),
                ServiceError::Lookup(
                    LookupError::Http(_) | LookupError::Api { .. } | LookupError::Parse(_),
                ) => "Postal code service error".to_string(),
                _ => err.to_string(),
            },
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cadastro_core::{Cep, CepError, CpfError, CustomerId};

    use crate::db::StoreError;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Service(ServiceError::NotFound(CustomerId::new(9)));
        assert_eq!(err.to_string(), "Service error: customer 9 not found");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: ServiceError) -> StatusCode {
            let response = AppError::from(err).into_response();
            response.status()
        }

        assert_eq!(
            get_status(ServiceError::NotFound(CustomerId::new(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(ServiceError::InvalidTaxId(CpfError::ChecksumMismatch)),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(ServiceError::Duplicate {
                name: "Ana".to_string(),
                tax_id: "11144477735".to_string(),
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(ServiceError::Lookup(LookupError::InvalidPostalCode(
                CepError::InvalidFormat
            ))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(ServiceError::Lookup(LookupError::UnknownPostalCode(
                Cep::parse("99999999").unwrap(),
            ))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            get_status(ServiceError::Lookup(LookupError::Api {
                status: 503,
                message: "unavailable".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            get_status(ServiceError::Store(StoreError::DataCorruption(
                "bad row".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
