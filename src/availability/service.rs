use chrono::Utc;
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};

use crate::availability::{
    AvailabilityError, AvailabilityResponse, SearchQuery, SearchResponse, SearchResultItem,
    SlotAvailability,
};
use crate::bookings::BookingsRepository;
use crate::catalog::{SlotCatalogRepository, WorkoutRepository, WorkoutType};
use crate::models::CoachProfile;
use crate::validation::parse_booking_date;

/// Resolves per-slot availability and the coach/workout search.
///
/// Read-only over the booking store: the catalog is merged with the active
/// bookings for a coach and date, never the other way around.
#[derive(Clone)]
pub struct AvailabilityService {
    pool: PgPool,
    slots: SlotCatalogRepository,
    workouts: WorkoutRepository,
    bookings: BookingsRepository,
}

impl AvailabilityService {
    /// Create a new AvailabilityService
    pub fn new(
        pool: PgPool,
        slots: SlotCatalogRepository,
        workouts: WorkoutRepository,
        bookings: BookingsRepository,
    ) -> Self {
        Self {
            pool,
            slots,
            workouts,
            bookings,
        }
    }

    /// Per-slot booked/free flags for a coach on one day.
    ///
    /// Returns the full catalog; a slot is booked iff an active booking
    /// (anything but cancelled) references it for that coach and date.
    pub async fn get_availability(
        &self,
        coach_id: i32,
        raw_date: &str,
    ) -> Result<AvailabilityResponse, AvailabilityError> {
        if !self.workouts.coach_exists(coach_id).await? {
            return Err(AvailabilityError::InvalidCoach(coach_id));
        }

        let date = parse_booking_date(raw_date)
            .map_err(|_| AvailabilityError::InvalidDate(format!("Cannot parse date '{}'", raw_date)))?;

        let catalog = self.slots.list_all().await?;
        let booked = self.bookings.active_slot_ids(coach_id, date).await?;

        let slots = catalog
            .into_iter()
            .map(|slot| {
                let is_booked = booked.contains(&slot.id);
                SlotAvailability { slot, is_booked }
            })
            .collect();

        Ok(AvailabilityResponse {
            coach_id,
            date,
            slots,
        })
    }

    /// Every coach/workout combination passing the filters, with free slots.
    ///
    /// When a slot filter is given a combination only qualifies if that slot
    /// is free, and the remaining free slots are still listed as
    /// alternatives for the same date.
    pub async fn search(&self, query: SearchQuery) -> Result<SearchResponse, AvailabilityError> {
        let date = match &query.date {
            Some(raw) => parse_booking_date(raw).map_err(|_| {
                AvailabilityError::InvalidDate(format!("Cannot parse date '{}'", raw))
            })?,
            None => Utc::now().date_naive(),
        };

        let mappings = self
            .workouts
            .list_mappings(query.coach_id, query.workout_id)
            .await?;

        if mappings.is_empty() {
            return Ok(SearchResponse {
                date,
                results: Vec::new(),
            });
        }

        let coach_ids: Vec<i32> = {
            let unique: HashSet<i32> = mappings.iter().map(|(c, _)| *c).collect();
            unique.into_iter().collect()
        };
        let workout_ids: Vec<i32> = {
            let unique: HashSet<i32> = mappings.iter().map(|(_, w)| *w).collect();
            unique.into_iter().collect()
        };

        let coaches: HashMap<i32, CoachProfile> = sqlx::query_as::<_, CoachProfile>(
            "SELECT id, name, rating FROM users WHERE id = ANY($1) AND role = 'coach'"
        )
        .bind(&coach_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

        let workout_types: HashMap<i32, WorkoutType> = self
            .workouts
            .find_by_ids(&workout_ids)
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        let catalog = self.slots.list_all().await?;

        // One availability lookup per coach, shared by all their combos
        let mut booked_by_coach: HashMap<i32, HashSet<i32>> = HashMap::new();
        for coach_id in &coach_ids {
            let booked = self.bookings.active_slot_ids(*coach_id, date).await?;
            booked_by_coach.insert(*coach_id, booked);
        }

        let mut results = Vec::new();
        for (coach_id, workout_type_id) in mappings {
            let (Some(coach), Some(workout_type)) = (
                coaches.get(&coach_id),
                workout_types.get(&workout_type_id),
            ) else {
                continue;
            };

            let booked = &booked_by_coach[&coach_id];
            let mut free_slots: Vec<_> = catalog
                .iter()
                .filter(|slot| !booked.contains(&slot.id))
                .cloned()
                .collect();

            let matched_slot = match query.time_slot_id {
                Some(slot_id) => {
                    let Some(pos) = free_slots.iter().position(|slot| slot.id == slot_id) else {
                        // Requested slot is taken (or unknown) for this coach
                        continue;
                    };
                    Some(free_slots.remove(pos))
                }
                None => None,
            };

            results.push(SearchResultItem {
                coach: coach.clone(),
                workout_type: workout_type.clone(),
                matched_slot,
                free_slots,
            });
        }

        Ok(SearchResponse { date, results })
    }
}
