//! Dashboard error types and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use misty_lifecycle::LifecycleError;
use misty_telemetry::TelemetryError;
use misty_wallet::WalletError;

/// Server startup/runtime failure.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error returned from an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Lifecycle(LifecycleError::AlreadyRunning) => StatusCode::BAD_REQUEST,
            Self::Lifecycle(LifecycleError::AlreadyTransitioning) => StatusCode::CONFLICT,
            Self::Lifecycle(LifecycleError::ConfigurationInvalid { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Lifecycle(LifecycleError::Collaborator { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Wallet(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Telemetry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            Self::Lifecycle(LifecycleError::ConfigurationInvalid { missing }) => {
                json!({ "error": self.to_string(), "missing": missing })
            }
            Self::Wallet(e) => json!({ "error": self.to_string(), "reason": e.reason() }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use misty_core::CollaboratorError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::from(LifecycleError::AlreadyRunning).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LifecycleError::AlreadyTransitioning).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(LifecycleError::ConfigurationInvalid {
                missing: vec!["rpc_endpoint".to_string()]
            })
            .status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::from(LifecycleError::Collaborator {
                name: "trading_engine",
                source: CollaboratorError::new("down"),
            })
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
