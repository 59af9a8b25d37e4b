use sqlx::PgPool;
use std::collections::HashSet;

use crate::catalog::{CatalogError, TimeSlot, WorkoutType};

/// Repository for the read-only slot catalog
#[derive(Clone)]
pub struct SlotCatalogRepository {
    pool: PgPool,
}

impl SlotCatalogRepository {
    /// Create a new SlotCatalogRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Fetch the full catalog, ordered by start time
    pub async fn list_all(&self) -> Result<Vec<TimeSlot>, CatalogError> {
        let slots = sqlx::query_as::<_, TimeSlot>(
            r#"
            SELECT id, start_time, end_time
            FROM time_slots
            ORDER BY start_time, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    /// Find a slot by id
    pub async fn find_by_id(&self, id: i32) -> Result<Option<TimeSlot>, CatalogError> {
        let slot = sqlx::query_as::<_, TimeSlot>(
            "SELECT id, start_time, end_time FROM time_slots WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(slot)
    }

    /// Number of slots in the catalog; zero signals a seeding failure
    pub async fn count(&self) -> Result<i64, CatalogError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time_slots")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Repository for workout types and the coach-to-workout mapping
#[derive(Clone)]
pub struct WorkoutRepository {
    pool: PgPool,
}

impl WorkoutRepository {
    /// Create a new WorkoutRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new workout type
    pub async fn create(&self, name: &str) -> Result<WorkoutType, CatalogError> {
        let workout = sqlx::query_as::<_, WorkoutType>(
            r#"
            INSERT INTO workout_types (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| match &err {
            // Unique violation on lower(name) means a duplicate name
            sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
                CatalogError::DuplicateName(name.to_string())
            }
            _ => CatalogError::DatabaseError(err.to_string()),
        })?;

        Ok(workout)
    }

    /// Check whether a workout type with the given name exists (case-insensitive)
    pub async fn exists_by_name(&self, name: &str) -> Result<bool, CatalogError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM workout_types WHERE LOWER(name) = LOWER($1))"
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Find a workout type by id
    pub async fn find_by_id(&self, id: i32) -> Result<Option<WorkoutType>, CatalogError> {
        let workout = sqlx::query_as::<_, WorkoutType>(
            "SELECT id, name FROM workout_types WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(workout)
    }

    /// Fetch all workout types, ordered by name
    pub async fn list_all(&self) -> Result<Vec<WorkoutType>, CatalogError> {
        let workouts = sqlx::query_as::<_, WorkoutType>(
            "SELECT id, name FROM workout_types ORDER BY name, id"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(workouts)
    }

    /// Find multiple workout types by id
    pub async fn find_by_ids(&self, ids: &[i32]) -> Result<Vec<WorkoutType>, CatalogError> {
        let workouts = sqlx::query_as::<_, WorkoutType>(
            "SELECT id, name FROM workout_types WHERE id = ANY($1)"
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(workouts)
    }

    /// Which of the given ids actually exist in the catalog
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<HashSet<i32>, CatalogError> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            "SELECT id FROM workout_types WHERE id = ANY($1)"
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Workout types a coach currently offers
    pub async fn list_for_coach(&self, coach_id: i32) -> Result<Vec<WorkoutType>, CatalogError> {
        let workouts = sqlx::query_as::<_, WorkoutType>(
            r#"
            SELECT w.id, w.name
            FROM workout_types w
            JOIN coach_workouts cw ON cw.workout_type_id = w.id
            WHERE cw.coach_id = $1
            ORDER BY w.name, w.id
            "#,
        )
        .bind(coach_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(workouts)
    }

    /// Ids of coaches offering a workout type
    pub async fn list_coaches_for_workout(
        &self,
        workout_type_id: i32,
    ) -> Result<Vec<i32>, CatalogError> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            r#"
            SELECT coach_id
            FROM coach_workouts
            WHERE workout_type_id = $1
            ORDER BY coach_id
            "#,
        )
        .bind(workout_type_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Coach/workout mapping pairs matching the optional filters
    pub async fn list_mappings(
        &self,
        coach_id: Option<i32>,
        workout_type_id: Option<i32>,
    ) -> Result<Vec<(i32, i32)>, CatalogError> {
        let rows: Vec<(i32, i32)> = sqlx::query_as(
            r#"
            SELECT coach_id, workout_type_id
            FROM coach_workouts
            WHERE ($1::int IS NULL OR coach_id = $1)
              AND ($2::int IS NULL OR workout_type_id = $2)
            ORDER BY coach_id, workout_type_id
            "#,
        )
        .bind(coach_id)
        .bind(workout_type_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Replace a coach's mapping set in one transaction.
    ///
    /// Diffs the stored set against the requested one, deletes the removed
    /// pairs and inserts the added ones. Rolls back entirely on any failure.
    /// Historical bookings referencing a removed workout type are untouched.
    pub async fn replace_coach_specializations(
        &self,
        coach_id: i32,
        workout_type_ids: &HashSet<i32>,
    ) -> Result<(), CatalogError> {
        let mut tx = self.pool.begin().await?;

        let current_rows: Vec<(i32,)> = sqlx::query_as(
            "SELECT workout_type_id FROM coach_workouts WHERE coach_id = $1 FOR UPDATE"
        )
        .bind(coach_id)
        .fetch_all(&mut *tx)
        .await?;

        let current: HashSet<i32> = current_rows.into_iter().map(|(id,)| id).collect();

        let removed: Vec<i32> = current.difference(workout_type_ids).copied().collect();
        let added: Vec<i32> = workout_type_ids.difference(&current).copied().collect();

        if !removed.is_empty() {
            sqlx::query(
                "DELETE FROM coach_workouts WHERE coach_id = $1 AND workout_type_id = ANY($2)"
            )
            .bind(coach_id)
            .bind(&removed)
            .execute(&mut *tx)
            .await?;
        }

        for workout_type_id in &added {
            sqlx::query(
                "INSERT INTO coach_workouts (coach_id, workout_type_id) VALUES ($1, $2)"
            )
            .bind(coach_id)
            .bind(workout_type_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            "Replaced specializations for coach {}: {} removed, {} added",
            coach_id,
            removed.len(),
            added.len()
        );

        Ok(())
    }

    /// Check whether an id resolves to a coach
    pub async fn coach_exists(&self, coach_id: i32) -> Result<bool, CatalogError> {
        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = 'coach')"
        )
        .bind(coach_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }
}
