//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{info, warn};

use crate::ai::GenerationError;

/// definitions for the recipeshare application.
#[derive(Debug)]
pub enum AppError {
    /// When you didn't do the right thing
    BadRequest(String),
    /// Missing or invalid bearer token
    Unauthorized,
    /// Authenticated, but not allowed to touch this
    Forbidden(String),
    /// When a requested resource is not found
    NotFound(String),
    /// Duplicate save of the same content
    Conflict(String),
    /// The model refused the ingredients, carries its reason
    Rejected(String),
    /// Every model failed; details stay in the logs
    GenerationFailed,
    /// When DB operations fail
    DatabaseError(sea_orm::DbErr),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<crate::signing::SigningError> for AppError {
    fn from(err: crate::signing::SigningError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::NoValidIngredients => AppError::BadRequest(err.to_string()),
            GenerationError::AllModelsFailed => AppError::GenerationFailed,
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> axum::response::Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::BadRequest(message) => {
                info!("Bad request received: {}", message);
                error_response(StatusCode::BAD_REQUEST, &message)
            }
            AppError::Unauthorized => {
                info!("Unauthorized request received");
                error_response(
                    StatusCode::UNAUTHORIZED,
                    "Unauthorized: invalid or missing token.",
                )
            }
            AppError::Forbidden(message) => {
                info!("Forbidden: {}", message);
                error_response(StatusCode::FORBIDDEN, &message)
            }
            AppError::NotFound(what) => {
                info!("404 {what}");
                error_response(StatusCode::NOT_FOUND, "Not Found")
            }
            AppError::Conflict(message) => {
                info!("Conflict: {}", message);
                error_response(StatusCode::CONFLICT, &message)
            }
            AppError::Rejected(message) => {
                info!("Generation rejected by model: {}", message);
                error_response(StatusCode::UNPROCESSABLE_ENTITY, &message)
            }
            AppError::GenerationFailed => {
                warn!("Recipe generation failed on every model");
                error_response(StatusCode::BAD_GATEWAY, "recipe generation failed")
            }
            AppError::DatabaseError(err) => {
                tracing::error!("Database error: {}", err);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error")
            }
            AppError::InternalServerError(message) => {
                tracing::error!("Internal server error: {}", message);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        }
    }
}
