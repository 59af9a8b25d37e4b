use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error types for catalog and mapping operations
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Workout type '{0}' already exists")]
    DuplicateName(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Coach with id {0} not found")]
    CoachNotFound(i32),

    #[error("Workout type with id {0} not found")]
    WorkoutNotFound(i32),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Empty slot catalog. Fatal at startup, never surfaced per-request.
    #[error("Slot catalog is empty; the deployment is not seeded")]
    EmptyCatalog,
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        CatalogError::DatabaseError(err.to_string())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            CatalogError::DatabaseError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            CatalogError::DuplicateName(name) => (
                StatusCode::CONFLICT,
                format!("Workout type '{}' already exists", name),
            ),
            CatalogError::InvalidReference(msg) => (StatusCode::BAD_REQUEST, msg),
            CatalogError::CoachNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Coach with id {} not found", id),
            ),
            CatalogError::WorkoutNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Workout type with id {} not found", id),
            ),
            CatalogError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            CatalogError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            CatalogError::EmptyCatalog => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Slot catalog is empty".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
