use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::{TimeSlot, WorkoutType};
use crate::models::CoachProfile;

/// One catalog slot with its booked/free flag for a coach and date
#[derive(Debug, Clone, Serialize)]
pub struct SlotAvailability {
    pub slot: TimeSlot,
    pub is_booked: bool,
}

/// Full availability picture for a coach on one day.
///
/// Carries the whole catalog rather than just the free slots so callers can
/// render both sides.
#[derive(Debug, Clone, Serialize)]
pub struct AvailabilityResponse {
    pub coach_id: i32,
    pub date: NaiveDate,
    pub slots: Vec<SlotAvailability>,
}

/// Query parameters for the search endpoint; all filters optional
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub workout_id: Option<i32>,
    pub coach_id: Option<i32>,
    pub time_slot_id: Option<i32>,
    /// ISO date or legacy bare day-of-month; defaults to today
    pub date: Option<String>,
}

/// One bookable coach/workout combination with its open slots
#[derive(Debug, Clone, Serialize)]
pub struct SearchResultItem {
    pub coach: CoachProfile,
    pub workout_type: WorkoutType,
    /// The slot the caller filtered on, when one was given and is free
    pub matched_slot: Option<TimeSlot>,
    /// Remaining free slots on the same date, as alternatives
    pub free_slots: Vec<TimeSlot>,
}

/// Search response with the resolved date echoed back
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub date: NaiveDate,
    pub results: Vec<SearchResultItem>,
}
