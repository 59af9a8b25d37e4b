// HTTP handlers for the workout catalog and the coach mapping

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::catalog::{
    CatalogError, CreateWorkoutTypeRequest, SetSpecializationsRequest, WorkoutType,
};
use crate::models::Role;

/// Handler for GET /api/workouts
pub async fn list_workouts_handler(
    State(state): State<crate::AppState>,
) -> Result<Json<Vec<WorkoutType>>, CatalogError> {
    let workouts = state.catalog_service.list_workout_types().await?;
    Ok(Json(workouts))
}

/// Handler for POST /api/workouts
/// Creates a new workout type (coaches and admins only)
pub async fn create_workout_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateWorkoutTypeRequest>,
) -> Result<(StatusCode, Json<WorkoutType>), CatalogError> {
    if user.role != Role::Coach && user.role != Role::Admin {
        return Err(CatalogError::Forbidden(
            "Only coaches and admins may create workout types".to_string(),
        ));
    }

    let workout = state.catalog_service.create_workout_type(request).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

/// Handler for GET /api/coaches/{id}/workouts
pub async fn list_coach_workouts_handler(
    State(state): State<crate::AppState>,
    Path(coach_id): Path<i32>,
) -> Result<Json<Vec<WorkoutType>>, CatalogError> {
    let workouts = state
        .catalog_service
        .list_workout_types_for_coach(coach_id)
        .await?;
    Ok(Json(workouts))
}

/// Handler for PUT /api/coaches/{id}/specializations
/// Replaces the coach's specialization set. A coach may only edit their own
/// set; admins may edit any.
pub async fn set_specializations_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(coach_id): Path<i32>,
    Json(request): Json<SetSpecializationsRequest>,
) -> Result<Json<Vec<WorkoutType>>, CatalogError> {
    let allowed = match user.role {
        Role::Admin => true,
        Role::Coach => user.user_id == coach_id,
        Role::Client => false,
    };
    if !allowed {
        return Err(CatalogError::Forbidden(
            "You may not edit this coach's specializations".to_string(),
        ));
    }

    let workouts = state
        .catalog_service
        .set_coach_specializations(coach_id, request.workout_type_ids)
        .await?;

    Ok(Json(workouts))
}

/// Handler for GET /api/workouts/{id}/coaches
pub async fn list_workout_coaches_handler(
    State(state): State<crate::AppState>,
    Path(workout_type_id): Path<i32>,
) -> Result<Json<Vec<i32>>, CatalogError> {
    let coaches = state
        .catalog_service
        .list_coaches_for_workout_type(workout_type_id)
        .await?;
    Ok(Json(coaches))
}
