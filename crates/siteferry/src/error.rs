use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

/// Request-level failure, mapped onto the admin API's response shapes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("invalid csrf token")]
    Csrf,

    #[error("too many requests, try again later")]
    RateLimited,

    #[error(transparent)]
    Archive(#[from] siteferry_archive::Error),

    #[error(transparent)]
    Manifest(#[from] siteferry_manifest::Error),

    #[error(transparent)]
    Upstream(#[from] siteferry_api::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("internal error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::Validation(message) => {
                (StatusCode::BAD_REQUEST, json!({ "error": message }))
            }
            AppError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": message }))
            }
            AppError::Csrf => (StatusCode::FORBIDDEN, json!({ "error": self.to_string() })),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": self.to_string() }),
            ),
            AppError::Upstream(err) => {
                // Relay whatever the platform said, best-effort, for
                // diagnostics in the panel.
                let details = err
                    .upstream_detail()
                    .map(str::to_owned)
                    .unwrap_or_else(|| err.to_string());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "error processing the deployment request", "details": details }),
                )
            }
            AppError::Archive(_) | AppError::Manifest(_) | AppError::Io(_) | AppError::Internal => {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": self.to_string() }),
                )
            }
        };

        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        (status, Json(body)).into_response()
    }
}
