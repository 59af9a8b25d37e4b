// HTTP handlers for feedback endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::feedback::{
    Feedback, FeedbackError, FeedbackListQuery, FeedbackPage, SubmitFeedbackRequest,
};
use crate::models::Role;

/// Handler for POST /api/bookings/{id}/feedback
/// Submits feedback for the authenticated client's booking
pub async fn submit_feedback_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(booking_id): Path<Uuid>,
    Json(request): Json<SubmitFeedbackRequest>,
) -> Result<(StatusCode, Json<Feedback>), FeedbackError> {
    if user.role != Role::Client {
        return Err(FeedbackError::Forbidden(
            "Only clients may leave feedback".to_string(),
        ));
    }

    let feedback = state
        .feedback_service
        .submit_feedback(user.user_id, booking_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// Handler for GET /api/coaches/{id}/feedback
pub async fn list_coach_feedback_handler(
    State(state): State<crate::AppState>,
    Path(coach_id): Path<i32>,
    Query(query): Query<FeedbackListQuery>,
) -> Result<Json<FeedbackPage>, FeedbackError> {
    let feedback_page = state
        .feedback_service
        .list_feedback_for_coach(coach_id, query.page, query.page_size, query.sort_by)
        .await?;

    Ok(Json(feedback_page))
}
