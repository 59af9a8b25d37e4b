use chrono::NaiveDate;
use sqlx::PgPool;
use std::collections::HashSet;
use uuid::Uuid;

use crate::bookings::{Booking, BookingError};

/// Repository for booking rows.
///
/// Every read joins the slot catalog so callers always have the slot's time
/// window at hand for derived-state computation.
#[derive(Clone)]
pub struct BookingsRepository {
    pool: PgPool,
}

impl BookingsRepository {
    /// Create a new BookingsRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new booking in the scheduled state.
    ///
    /// The anti-double-booking invariant is enforced by the partial unique
    /// index on (coach_id, time_slot_id, booking_date) over non-cancelled
    /// rows: under concurrent inserts for the same triple the database lets
    /// exactly one through and the rest surface as SlotAlreadyBooked. No
    /// read-then-write check is needed, so there is no race window.
    pub async fn insert(
        &self,
        client_id: i32,
        coach_id: i32,
        workout_type_id: i32,
        time_slot_id: i32,
        booking_date: NaiveDate,
    ) -> Result<Booking, BookingError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            WITH inserted AS (
                INSERT INTO bookings (id, client_id, coach_id, workout_type_id, time_slot_id, booking_date, state)
                VALUES ($1, $2, $3, $4, $5, $6, 'scheduled')
                RETURNING *
            )
            SELECT inserted.id, inserted.client_id, inserted.coach_id,
                   inserted.workout_type_id, inserted.time_slot_id,
                   inserted.booking_date, inserted.state, inserted.feedback_id,
                   inserted.created_at, inserted.updated_at,
                   s.start_time AS slot_start_time, s.end_time AS slot_end_time
            FROM inserted
            JOIN time_slots s ON s.id = inserted.time_slot_id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(client_id)
        .bind(coach_id)
        .bind(workout_type_id)
        .bind(time_slot_id)
        .bind(booking_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                BookingError::SlotAlreadyBooked
            }
            _ => BookingError::DatabaseError(err.to_string()),
        })?;

        Ok(booking)
    }

    /// Find a booking by id
    pub async fn find_by_id(&self, booking_id: Uuid) -> Result<Option<Booking>, BookingError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            SELECT b.id, b.client_id, b.coach_id, b.workout_type_id, b.time_slot_id,
                   b.booking_date, b.state, b.feedback_id, b.created_at, b.updated_at,
                   s.start_time AS slot_start_time, s.end_time AS slot_end_time
            FROM bookings b
            JOIN time_slots s ON s.id = b.time_slot_id
            WHERE b.id = $1
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Slot ids occupied by active bookings for a coach on a date
    pub async fn active_slot_ids(
        &self,
        coach_id: i32,
        booking_date: NaiveDate,
    ) -> Result<HashSet<i32>, BookingError> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT time_slot_id
            FROM bookings
            WHERE coach_id = $1 AND booking_date = $2 AND state <> 'cancelled'
            "#,
        )
        .bind(coach_id)
        .bind(booking_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// All bookings a client ever made, newest session first
    pub async fn find_by_client(&self, client_id: i32) -> Result<Vec<Booking>, BookingError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT b.id, b.client_id, b.coach_id, b.workout_type_id, b.time_slot_id,
                   b.booking_date, b.state, b.feedback_id, b.created_at, b.updated_at,
                   s.start_time AS slot_start_time, s.end_time AS slot_end_time
            FROM bookings b
            JOIN time_slots s ON s.id = b.time_slot_id
            WHERE b.client_id = $1
            ORDER BY b.booking_date DESC, s.start_time DESC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// A client's bookings for one calendar day, in slot order
    pub async fn find_by_client_and_date(
        &self,
        client_id: i32,
        booking_date: NaiveDate,
    ) -> Result<Vec<Booking>, BookingError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT b.id, b.client_id, b.coach_id, b.workout_type_id, b.time_slot_id,
                   b.booking_date, b.state, b.feedback_id, b.created_at, b.updated_at,
                   s.start_time AS slot_start_time, s.end_time AS slot_end_time
            FROM bookings b
            JOIN time_slots s ON s.id = b.time_slot_id
            WHERE b.client_id = $1 AND b.booking_date = $2
            ORDER BY s.start_time
            "#,
        )
        .bind(client_id)
        .bind(booking_date)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Flip a booking to cancelled, guarded on the stored state.
    ///
    /// The WHERE clause makes the flip a single atomic compare-and-set:
    /// of two concurrent cancels exactly one matches the scheduled row and
    /// the other gets None back.
    pub async fn cancel_if_scheduled(
        &self,
        booking_id: Uuid,
    ) -> Result<Option<Booking>, BookingError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            WITH updated AS (
                UPDATE bookings
                SET state = 'cancelled', updated_at = NOW()
                WHERE id = $1 AND state = 'scheduled'
                RETURNING *
            )
            SELECT updated.id, updated.client_id, updated.coach_id,
                   updated.workout_type_id, updated.time_slot_id,
                   updated.booking_date, updated.state, updated.feedback_id,
                   updated.created_at, updated.updated_at,
                   s.start_time AS slot_start_time, s.end_time AS slot_end_time
            FROM updated
            JOIN time_slots s ON s.id = updated.time_slot_id
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Check whether an id resolves to a user with the given role
    pub async fn user_exists_with_role(
        &self,
        user_id: i32,
        role: &str,
    ) -> Result<bool, BookingError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = $2)"
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }
}
