use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Feedback left for a completed session.
///
/// Created exactly once per booking and immutable afterwards; there is no
/// edit or delete path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub rating: i16,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for submitting feedback on a booking
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitFeedbackRequest {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 1000, message = "Message must not exceed 1000 characters"))]
    #[serde(default)]
    pub message: String,
}

/// Sort orders for the coach feedback listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSort {
    /// Highest rating first
    Rating,
    /// Lowest rating first
    RatingAsc,
    /// Newest first (the default)
    Timestamp,
    /// Oldest first
    TimestampAsc,
}

impl Default for FeedbackSort {
    fn default() -> Self {
        FeedbackSort::Timestamp
    }
}

/// Query parameters for the coach feedback listing
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<FeedbackSort>,
}

/// One page of a coach's feedback
#[derive(Debug, Serialize)]
pub struct FeedbackPage {
    pub items: Vec<Feedback>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_deserialization() {
        let sort: FeedbackSort = serde_json::from_str("\"rating_asc\"").unwrap();
        assert_eq!(sort, FeedbackSort::RatingAsc);
        let sort: FeedbackSort = serde_json::from_str("\"timestamp\"").unwrap();
        assert_eq!(sort, FeedbackSort::Timestamp);
    }

    #[test]
    fn test_sort_rejects_unknown_value() {
        assert!(serde_json::from_str::<FeedbackSort>("\"stars\"").is_err());
    }

    #[test]
    fn test_message_defaults_to_empty() {
        let request: SubmitFeedbackRequest = serde_json::from_str(r#"{"rating": 4}"#).unwrap();
        assert_eq!(request.rating, 4);
        assert_eq!(request.message, "");
    }
}
