// HTTP handlers for availability and search

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::availability::{
    AvailabilityError, AvailabilityResponse, SearchQuery, SearchResponse,
};

/// Query parameters for the availability endpoint
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    /// ISO date or legacy bare day-of-month
    pub date: Option<String>,
}

/// Handler for GET /api/coaches/{id}/availability
pub async fn get_availability_handler(
    State(state): State<crate::AppState>,
    Path(coach_id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AvailabilityError> {
    let date = query
        .date
        .ok_or_else(|| AvailabilityError::InvalidDate("Missing 'date' query parameter".to_string()))?;

    let availability = state
        .availability_service
        .get_availability(coach_id, &date)
        .await?;

    Ok(Json(availability))
}

/// Handler for GET /api/search
/// Returns bookable coach/workout combinations matching the filters
pub async fn search_handler(
    State(state): State<crate::AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>, AvailabilityError> {
    let response = state.availability_service.search(query).await?;
    Ok(Json(response))
}
