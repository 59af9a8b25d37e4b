use uuid::Uuid;
use validator::Validate;

use crate::feedback::{
    Feedback, FeedbackError, FeedbackPage, FeedbackRepository, FeedbackSort, SubmitFeedbackRequest,
};
use crate::validation::validate_rating_range;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Service layer for feedback submission and the coach feedback listing
#[derive(Clone)]
pub struct FeedbackService {
    repository: FeedbackRepository,
}

impl FeedbackService {
    /// Create a new FeedbackService
    pub fn new(repository: FeedbackRepository) -> Self {
        Self { repository }
    }

    /// Submit feedback for a booking.
    ///
    /// Input shape is validated up front; the lifecycle gate (booking must
    /// be waiting for feedback), the state flip to completed and the rating
    /// recomputation all happen atomically in the repository.
    pub async fn submit_feedback(
        &self,
        user_id: i32,
        booking_id: Uuid,
        request: SubmitFeedbackRequest,
    ) -> Result<Feedback, FeedbackError> {
        if validate_rating_range(request.rating).is_err() {
            return Err(FeedbackError::InvalidRating(request.rating));
        }
        request
            .validate()
            .map_err(|e| FeedbackError::ValidationError(format!("Validation failed: {}", e)))?;

        self.repository
            .submit(booking_id, user_id, request.rating, &request.message)
            .await
    }

    /// Paged feedback listing for a coach
    pub async fn list_feedback_for_coach(
        &self,
        coach_id: i32,
        page: Option<i64>,
        page_size: Option<i64>,
        sort_by: Option<FeedbackSort>,
    ) -> Result<FeedbackPage, FeedbackError> {
        if !self.repository.coach_exists(coach_id).await? {
            return Err(FeedbackError::CoachNotFound(coach_id));
        }

        let page = page.unwrap_or(1).max(1);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let sort = sort_by.unwrap_or_default();

        let items = self
            .repository
            .list_for_coach(coach_id, page, page_size, sort)
            .await?;
        let total = self.repository.count_for_coach(coach_id).await?;

        Ok(FeedbackPage {
            items,
            page,
            page_size,
            total,
        })
    }
}
