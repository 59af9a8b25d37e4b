use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for booking lifecycle operations
#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Booking not found")]
    NotFound,

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Slot is already booked for this coach and date")]
    SlotAlreadyBooked,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl From<sqlx::Error> for BookingError {
    fn from(err: sqlx::Error) -> Self {
        BookingError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            BookingError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            BookingError::NotFound => (StatusCode::NOT_FOUND, "Booking not found".to_string()),
            BookingError::InvalidReference(msg) => (StatusCode::BAD_REQUEST, msg),
            BookingError::SlotAlreadyBooked => (
                StatusCode::CONFLICT,
                "Slot is already booked for this coach and date".to_string(),
            ),
            BookingError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            BookingError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg),
            BookingError::InvalidDate(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
