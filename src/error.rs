//! Typed errors and HTTP mapping. Every error leaves through the response envelope.

use crate::response::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("invalid boundaries: {0}")]
    InvalidBoundaries(String),
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// A write did not affect exactly one row. The count is kept for logs only.
    #[error("internal error")]
    MutationConflict { entity: &'static str, affected: u64 },
    #[error("internal error: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::InvalidBoundaries(_) => StatusCode::BAD_REQUEST,
            AppError::UnknownEntity(_) | AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::MutationConflict { .. } | AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Db(e) => tracing::error!(error = %e, "database error"),
            AppError::MutationConflict { entity, affected } => {
                tracing::error!(entity, affected, "write did not affect exactly one row")
            }
            AppError::Config(e) => tracing::error!(error = %e, "configuration error"),
            _ => tracing::debug!(error = %self, "request rejected"),
        }
        (self.status(), Json(Envelope::failure(self.to_string()))).into_response()
    }
}
