use std::collections::HashSet;

use validator::Validate;

use crate::catalog::{
    CatalogError, CreateWorkoutTypeRequest, SlotCatalogRepository, TimeSlot, WorkoutRepository,
    WorkoutType,
};

/// Service layer for the slot catalog and the coach/workout mapping
#[derive(Clone)]
pub struct CatalogService {
    slots: SlotCatalogRepository,
    workouts: WorkoutRepository,
}

impl CatalogService {
    /// Create a new CatalogService
    pub fn new(slots: SlotCatalogRepository, workouts: WorkoutRepository) -> Self {
        Self { slots, workouts }
    }

    /// Startup guard: an unseeded slot catalog is a deployment error, not a
    /// per-request condition. Called once from main before serving traffic.
    pub async fn assert_catalog_seeded(&self) -> Result<(), CatalogError> {
        if self.slots.count().await? == 0 {
            return Err(CatalogError::EmptyCatalog);
        }
        Ok(())
    }

    /// The full ordered slot catalog
    pub async fn list_slots(&self) -> Result<Vec<TimeSlot>, CatalogError> {
        self.slots.list_all().await
    }

    /// All workout types
    pub async fn list_workout_types(&self) -> Result<Vec<WorkoutType>, CatalogError> {
        self.workouts.list_all().await
    }

    /// Create a new workout type
    ///
    /// Names are free text but unique case-insensitively; a collision fails
    /// with DuplicateName before any write.
    pub async fn create_workout_type(
        &self,
        request: CreateWorkoutTypeRequest,
    ) -> Result<WorkoutType, CatalogError> {
        request
            .validate()
            .map_err(|e| CatalogError::ValidationError(format!("Validation failed: {}", e)))?;

        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::ValidationError(
                "Workout type name must not be blank".to_string(),
            ));
        }

        if self.workouts.exists_by_name(&name).await? {
            return Err(CatalogError::DuplicateName(name));
        }

        let workout = self.workouts.create(&name).await?;
        tracing::info!("Created workout type {} ('{}')", workout.id, workout.name);
        Ok(workout)
    }

    /// Replace a coach's full specialization set.
    ///
    /// Validates every referenced workout type before touching the mapping;
    /// the diff-and-replace itself runs in one transaction in the repository.
    pub async fn set_coach_specializations(
        &self,
        coach_id: i32,
        workout_type_ids: Vec<i32>,
    ) -> Result<Vec<WorkoutType>, CatalogError> {
        if !self.workouts.coach_exists(coach_id).await? {
            return Err(CatalogError::CoachNotFound(coach_id));
        }

        let requested: HashSet<i32> = workout_type_ids.into_iter().collect();

        if !requested.is_empty() {
            let ids: Vec<i32> = requested.iter().copied().collect();
            let existing = self.workouts.existing_ids(&ids).await?;
            for id in &requested {
                if !existing.contains(id) {
                    return Err(CatalogError::InvalidReference(format!(
                        "Workout type with id {} does not exist",
                        id
                    )));
                }
            }
        }

        self.workouts
            .replace_coach_specializations(coach_id, &requested)
            .await?;

        self.workouts.list_for_coach(coach_id).await
    }

    /// Workout types a coach offers
    pub async fn list_workout_types_for_coach(
        &self,
        coach_id: i32,
    ) -> Result<Vec<WorkoutType>, CatalogError> {
        if !self.workouts.coach_exists(coach_id).await? {
            return Err(CatalogError::CoachNotFound(coach_id));
        }
        self.workouts.list_for_coach(coach_id).await
    }

    /// Coaches offering a workout type
    pub async fn list_coaches_for_workout_type(
        &self,
        workout_type_id: i32,
    ) -> Result<Vec<i32>, CatalogError> {
        if self.workouts.find_by_id(workout_type_id).await?.is_none() {
            return Err(CatalogError::WorkoutNotFound(workout_type_id));
        }
        self.workouts.list_coaches_for_workout(workout_type_id).await
    }
}
