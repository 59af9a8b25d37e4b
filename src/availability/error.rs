use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::bookings::BookingError;
use crate::catalog::CatalogError;

/// Error types for availability and search operations
#[derive(Debug, thiserror::Error)]
pub enum AvailabilityError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Coach with id {0} not found")]
    InvalidCoach(i32),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl From<sqlx::Error> for AvailabilityError {
    fn from(err: sqlx::Error) -> Self {
        AvailabilityError::DatabaseError(err.to_string())
    }
}

impl From<CatalogError> for AvailabilityError {
    fn from(err: CatalogError) -> Self {
        AvailabilityError::DatabaseError(err.to_string())
    }
}

impl From<BookingError> for AvailabilityError {
    fn from(err: BookingError) -> Self {
        AvailabilityError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for AvailabilityError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AvailabilityError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AvailabilityError::InvalidCoach(id) => (
                StatusCode::NOT_FOUND,
                format!("Coach with id {} not found", id),
            ),
            AvailabilityError::InvalidDate(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
