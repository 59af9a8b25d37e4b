use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use crate::error::ApiError;
use crate::models::CoachProfile;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Creates and configures a PostgreSQL connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
///
/// # Returns
/// * `Result<DbPool>` - Configured connection pool or error
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Fetch all coach profiles, ordered by name
pub async fn list_coaches(pool: &PgPool) -> Result<Vec<CoachProfile>, ApiError> {
    let coaches = sqlx::query_as::<_, CoachProfile>(
        r#"
        SELECT id, name, rating
        FROM users
        WHERE role = 'coach'
        ORDER BY name, id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(coaches)
}

/// Fetch a single coach profile by id
pub async fn find_coach(pool: &PgPool, coach_id: i32) -> Result<Option<CoachProfile>, ApiError> {
    let coach = sqlx::query_as::<_, CoachProfile>(
        "SELECT id, name, rating FROM users WHERE id = $1 AND role = 'coach'"
    )
    .bind(coach_id)
    .fetch_optional(pool)
    .await?;

    Ok(coach)
}
