use chrono::Utc;
use uuid::Uuid;

use crate::bookings::{
    BookingError, BookingResponse, BookingState, BookingsRepository, CreateBookingRequest,
};
use crate::catalog::{CatalogError, SlotCatalogRepository, WorkoutRepository};
use crate::validation::parse_booking_date;

impl From<CatalogError> for BookingError {
    fn from(err: CatalogError) -> Self {
        BookingError::DatabaseError(err.to_string())
    }
}

/// Service owning the booking lifecycle: creation, cancellation and the
/// derived-state reads. The only component that writes booking rows.
#[derive(Clone)]
pub struct BookingService {
    bookings: BookingsRepository,
    slots: SlotCatalogRepository,
    workouts: WorkoutRepository,
}

impl BookingService {
    /// Create a new BookingService
    pub fn new(
        bookings: BookingsRepository,
        slots: SlotCatalogRepository,
        workouts: WorkoutRepository,
    ) -> Self {
        Self {
            bookings,
            slots,
            workouts,
        }
    }

    /// Book a slot for a client.
    ///
    /// Every reference is validated before the write; the insert itself is
    /// race-free through the active-booking unique index, so concurrent
    /// calls for the same (coach, slot, date) triple yield exactly one
    /// created booking and SlotAlreadyBooked for the rest.
    pub async fn book_slot(
        &self,
        client_id: i32,
        request: CreateBookingRequest,
    ) -> Result<BookingResponse, BookingError> {
        let booking_date = parse_booking_date(&request.date)
            .map_err(|_| BookingError::InvalidDate(format!("Cannot parse date '{}'", request.date)))?;

        if !self.bookings.user_exists_with_role(client_id, "client").await? {
            return Err(BookingError::InvalidReference(format!(
                "Client with id {} does not exist",
                client_id
            )));
        }
        if !self.bookings.user_exists_with_role(request.coach_id, "coach").await? {
            return Err(BookingError::InvalidReference(format!(
                "Coach with id {} does not exist",
                request.coach_id
            )));
        }
        if self.workouts.find_by_id(request.workout_id).await?.is_none() {
            return Err(BookingError::InvalidReference(format!(
                "Workout type with id {} does not exist",
                request.workout_id
            )));
        }
        if self.slots.find_by_id(request.time_slot_id).await?.is_none() {
            return Err(BookingError::InvalidReference(format!(
                "Time slot with id {} does not exist",
                request.time_slot_id
            )));
        }

        let booking = self
            .bookings
            .insert(
                client_id,
                request.coach_id,
                request.workout_id,
                request.time_slot_id,
                booking_date,
            )
            .await?;

        tracing::info!(
            "Booked slot {} for client {} with coach {} on {}",
            booking.time_slot_id,
            booking.client_id,
            booking.coach_id,
            booking.booking_date
        );

        Ok(BookingResponse::from_booking(booking, Utc::now().naive_utc()))
    }

    /// Cancel a scheduled booking.
    ///
    /// Only the booking's client may cancel, and only while the derived
    /// state is still scheduled: once the slot's end time has passed the
    /// session counts as held and can no longer be called off. The state
    /// flip is a guarded single-row update, so of two concurrent cancels
    /// exactly one wins and the other observes InvalidState.
    pub async fn cancel_booking(
        &self,
        user_id: i32,
        booking_id: Uuid,
    ) -> Result<BookingResponse, BookingError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or(BookingError::NotFound)?;

        if booking.client_id != user_id {
            return Err(BookingError::Forbidden(
                "Only the booking's client may cancel it".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let derived = booking.derived_state(now);
        if derived != BookingState::Scheduled {
            return Err(BookingError::InvalidState(format!(
                "Cannot cancel a booking in the {} state",
                derived
            )));
        }

        // The guard re-checks the stored state; a concurrent cancel that got
        // there first makes this return None.
        let cancelled = self
            .bookings
            .cancel_if_scheduled(booking_id)
            .await?
            .ok_or_else(|| {
                BookingError::InvalidState("Booking is no longer in the scheduled state".to_string())
            })?;

        tracing::info!(
            "Cancelled booking {}; slot {} on {} is free again",
            cancelled.id,
            cancelled.time_slot_id,
            cancelled.booking_date
        );

        Ok(BookingResponse::from_booking(cancelled, now))
    }

    /// All bookings for a client, with derived states
    pub async fn list_bookings_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<BookingResponse>, BookingError> {
        let now = Utc::now().naive_utc();
        let bookings = self.bookings.find_by_client(user_id).await?;
        Ok(bookings
            .into_iter()
            .map(|b| BookingResponse::from_booking(b, now))
            .collect())
    }

    /// A client's bookings for one day, with derived states
    pub async fn list_bookings_for_day(
        &self,
        user_id: i32,
        raw_date: &str,
    ) -> Result<Vec<BookingResponse>, BookingError> {
        let booking_date = parse_booking_date(raw_date)
            .map_err(|_| BookingError::InvalidDate(format!("Cannot parse date '{}'", raw_date)))?;

        let now = Utc::now().naive_utc();
        let bookings = self
            .bookings
            .find_by_client_and_date(user_id, booking_date)
            .await?;
        Ok(bookings
            .into_iter()
            .map(|b| BookingResponse::from_booking(b, now))
            .collect())
    }
}
