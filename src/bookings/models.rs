use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::bookings::state_machine::StateMachine;

/// Lifecycle state of a booking.
///
/// Every state except `Cancelled` occupies its slot and blocks rebooking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingState {
    Scheduled,
    WaitingForFeedback,
    Completed,
    Cancelled,
}

impl BookingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingState::Scheduled => "scheduled",
            BookingState::WaitingForFeedback => "waiting_for_feedback",
            BookingState::Completed => "completed",
            BookingState::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "scheduled" => Ok(BookingState::Scheduled),
            "waiting_for_feedback" => Ok(BookingState::WaitingForFeedback),
            "completed" => Ok(BookingState::Completed),
            "cancelled" => Ok(BookingState::Cancelled),
            _ => Err(format!("Invalid booking state: {}", s)),
        }
    }

    /// Active states hold their slot against new bookings
    pub fn is_active(&self) -> bool {
        !matches!(self, BookingState::Cancelled)
    }

    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingState::Completed | BookingState::Cancelled)
    }
}

impl std::fmt::Display for BookingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A booking row joined with its slot's time window.
///
/// The `state` field is the stored value, which may lag behind reality for
/// the time-driven scheduled -> waiting_for_feedback transition. Callers go
/// through `derived_state` for the authoritative value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: i32,
    pub coach_id: i32,
    pub workout_type_id: i32,
    pub time_slot_id: i32,
    pub booking_date: NaiveDate,
    pub state: BookingState,
    pub feedback_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub slot_start_time: NaiveTime,
    pub slot_end_time: NaiveTime,
}

impl Booking {
    /// True lifecycle state, recomputed against the given clock
    pub fn derived_state(&self, now: NaiveDateTime) -> BookingState {
        StateMachine::derive(self.state, self.booking_date, self.slot_end_time, now)
    }
}

/// Request DTO for creating a booking.
///
/// The date travels as a raw string because the wire format still accepts
/// the legacy bare day-of-month shorthand next to ISO dates.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBookingRequest {
    pub coach_id: i32,
    pub workout_id: i32,
    pub time_slot_id: i32,
    pub date: String,
}

/// Response DTO carrying the derived rather than stored state
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub client_id: i32,
    pub coach_id: i32,
    pub workout_id: i32,
    pub time_slot_id: i32,
    pub date: NaiveDate,
    pub state: BookingState,
    pub feedback_id: Option<Uuid>,
    pub slot_start_time: NaiveTime,
    pub slot_end_time: NaiveTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingResponse {
    /// Build a response from a stored row, deriving the state at `now`
    pub fn from_booking(booking: Booking, now: NaiveDateTime) -> Self {
        let state = booking.derived_state(now);
        Self {
            id: booking.id,
            client_id: booking.client_id,
            coach_id: booking.coach_id,
            workout_id: booking.workout_type_id,
            time_slot_id: booking.time_slot_id,
            date: booking.booking_date,
            state,
            feedback_id: booking.feedback_id,
            slot_start_time: booking.slot_start_time,
            slot_end_time: booking.slot_end_time,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}
