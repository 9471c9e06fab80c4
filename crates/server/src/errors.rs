use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{debug, error};

use crate::validation::FieldError;

pub const PRODUCT_NOT_FOUND: &str = "Producto No Encontrado";
pub const MALFORMED_JSON: &str = "JSON no valido";

/// Everything a product handler can answer besides success.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{} validation error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("product not found")]
    NotFound,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    /// Rejected by the persistence layer after request validation passed.
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => ApiError::NotFound,
            ServiceError::Validation(msg) => ApiError::Rejected(msg),
            ServiceError::Db(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({"errors": errors}))).into_response()
            }
            ApiError::NotFound => {
                (StatusCode::NOT_FOUND, Json(serde_json::json!({"error": PRODUCT_NOT_FOUND}))).into_response()
            }
            ApiError::MalformedBody(detail) => {
                debug!(%detail, "malformed json body");
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": MALFORMED_JSON}))).into_response()
            }
            ApiError::Rejected(msg) => {
                (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": msg}))).into_response()
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"error": "Internal Server Error"})),
                )
                    .into_response()
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("database unavailable: {0}")]
    Database(String),
    #[error("cannot bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
}
