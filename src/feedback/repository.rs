use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::bookings::{BookingState, StateMachine};
use crate::feedback::rating_calculator::mean_rating;
use crate::feedback::{Feedback, FeedbackError, FeedbackSort};

/// Booking fields needed to gate feedback submission, locked for update
#[derive(Debug, FromRow)]
struct BookingGuard {
    id: Uuid,
    client_id: i32,
    coach_id: i32,
    state: BookingState,
    booking_date: NaiveDate,
    slot_end_time: NaiveTime,
}

/// Repository for feedback rows and the coach rating aggregate
#[derive(Clone)]
pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    /// Create a new FeedbackRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Submit feedback for a booking in one transaction.
    ///
    /// The booking row is locked first, then the derived state is checked
    /// against the server clock, the feedback inserted, the booking closed
    /// (completed + feedback link) and the coach's mean rating recomputed
    /// from the full rating set. A failure at any step rolls everything
    /// back, so a booking can never read as completed without its feedback
    /// or vice versa.
    pub async fn submit(
        &self,
        booking_id: Uuid,
        client_id: i32,
        rating: i16,
        message: &str,
    ) -> Result<Feedback, FeedbackError> {
        let mut tx = self.pool.begin().await?;

        let guard = sqlx::query_as::<_, BookingGuard>(
            r#"
            SELECT b.id, b.client_id, b.coach_id, b.state, b.booking_date,
                   s.end_time AS slot_end_time
            FROM bookings b
            JOIN time_slots s ON s.id = b.time_slot_id
            WHERE b.id = $1
            FOR UPDATE OF b
            "#,
        )
        .bind(booking_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(FeedbackError::BookingNotFound)?;

        if guard.client_id != client_id {
            return Err(FeedbackError::Forbidden(
                "Only the booking's client may leave feedback".to_string(),
            ));
        }

        let now = Utc::now().naive_utc();
        let derived = StateMachine::derive(
            guard.state,
            guard.booking_date,
            guard.slot_end_time,
            now,
        );
        if derived != BookingState::WaitingForFeedback {
            return Err(FeedbackError::InvalidState(format!(
                "Cannot submit feedback for a booking in the {} state",
                derived
            )));
        }

        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (id, booking_id, rating, message)
            VALUES ($1, $2, $3, $4)
            RETURNING id, booking_id, rating, message, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(guard.id)
        .bind(rating)
        .bind(message)
        .fetch_one(&mut *tx)
        .await
        .map_err(|err| match &err {
            // Unique constraint on booking_id: feedback already recorded
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                FeedbackError::InvalidState(
                    "Feedback has already been submitted for this booking".to_string(),
                )
            }
            _ => FeedbackError::DatabaseError(err.to_string()),
        })?;

        sqlx::query(
            r#"
            UPDATE bookings
            SET state = 'completed', feedback_id = $1, updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(feedback.id)
        .bind(guard.id)
        .execute(&mut *tx)
        .await?;

        // Full recomputation of the coach aggregate, inside the same
        // transaction, so it includes the row just inserted.
        let ratings: Vec<(i16,)> = sqlx::query_as(
            r#"
            SELECT f.rating
            FROM feedback f
            JOIN bookings b ON b.id = f.booking_id
            WHERE b.coach_id = $1
            "#,
        )
        .bind(guard.coach_id)
        .fetch_all(&mut *tx)
        .await?;

        let ratings: Vec<i16> = ratings.into_iter().map(|(r,)| r).collect();
        let average = mean_rating(&ratings);

        sqlx::query("UPDATE users SET rating = $1 WHERE id = $2")
            .bind(average)
            .bind(guard.coach_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Recorded feedback {} for booking {}; coach {} rating is now {:?}",
            feedback.id,
            booking_id,
            guard.coach_id,
            average
        );

        Ok(feedback)
    }

    /// One page of a coach's feedback in the requested order.
    ///
    /// Ties are broken by insertion order (created_at, then id) so the
    /// listing is stable across requests.
    pub async fn list_for_coach(
        &self,
        coach_id: i32,
        page: i64,
        page_size: i64,
        sort: FeedbackSort,
    ) -> Result<Vec<Feedback>, FeedbackError> {
        let order_by = match sort {
            FeedbackSort::Rating => "f.rating DESC, f.created_at ASC, f.id ASC",
            FeedbackSort::RatingAsc => "f.rating ASC, f.created_at ASC, f.id ASC",
            FeedbackSort::Timestamp => "f.created_at DESC, f.id ASC",
            FeedbackSort::TimestampAsc => "f.created_at ASC, f.id ASC",
        };

        let query = format!(
            r#"
            SELECT f.id, f.booking_id, f.rating, f.message, f.created_at
            FROM feedback f
            JOIN bookings b ON b.id = f.booking_id
            WHERE b.coach_id = $1
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            order_by
        );

        let feedback = sqlx::query_as::<_, Feedback>(&query)
            .bind(coach_id)
            .bind(page_size)
            .bind((page - 1) * page_size)
            .fetch_all(&self.pool)
            .await?;

        Ok(feedback)
    }

    /// Total feedback count for a coach
    pub async fn count_for_coach(&self, coach_id: i32) -> Result<i64, FeedbackError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM feedback f
            JOIN bookings b ON b.id = f.booking_id
            WHERE b.coach_id = $1
            "#,
        )
        .bind(coach_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Check whether an id resolves to a coach
    pub async fn coach_exists(&self, coach_id: i32) -> Result<bool, FeedbackError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = 'coach')"
        )
        .bind(coach_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }
}
