use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for feedback operations
#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Booking not found")]
    BookingNotFound,

    #[error("Coach with id {0} not found")]
    CoachNotFound(i32),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Invalid rating: {0} (must be an integer between 1 and 5)")]
    InvalidRating(i16),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<sqlx::Error> for FeedbackError {
    fn from(err: sqlx::Error) -> Self {
        FeedbackError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for FeedbackError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            FeedbackError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            FeedbackError::BookingNotFound => {
                (StatusCode::NOT_FOUND, "Booking not found".to_string())
            }
            FeedbackError::CoachNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Coach with id {} not found", id),
            ),
            FeedbackError::InvalidState(msg) => (StatusCode::BAD_REQUEST, msg),
            FeedbackError::InvalidRating(rating) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid rating: {} (must be an integer between 1 and 5)", rating),
            ),
            FeedbackError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            FeedbackError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
