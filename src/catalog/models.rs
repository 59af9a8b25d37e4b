use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// One fixed daily time window from the globally shared slot catalog.
///
/// Reference data seeded at deployment time; never mutated by user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TimeSlot {
    #[schema(example = 2)]
    pub id: i32,
    #[schema(example = "09:00:00")]
    pub start_time: NaiveTime,
    #[schema(example = "10:00:00")]
    pub end_time: NaiveTime,
}

/// A kind of session a coach can offer (e.g. "Yoga", "Strength")
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutType {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Yoga")]
    pub name: String,
}

/// Request DTO for creating a workout type
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkoutTypeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[schema(example = "Pilates")]
    pub name: String,
}

/// Request DTO for replacing a coach's full specialization set
#[derive(Debug, Deserialize, Validate)]
pub struct SetSpecializationsRequest {
    pub workout_type_ids: Vec<i32>,
}
