mod auth;
mod availability;
mod bookings;
mod catalog;
mod db;
mod error;
mod feedback;
mod models;
mod validation;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use availability::AvailabilityService;
use bookings::{BookingService, BookingsRepository};
use catalog::{CatalogService, SlotCatalogRepository, TimeSlot, WorkoutRepository, WorkoutType};
use error::ApiError;
use feedback::{FeedbackRepository, FeedbackService};
use models::{CoachProfile, Role};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        get_all_slots,
        get_all_coaches,
        get_coach_by_id,
    ),
    components(
        schemas(TimeSlot, WorkoutType, CoachProfile, Role)
    ),
    tags(
        (name = "catalog", description = "Time slot and coach catalog endpoints")
    ),
    info(
        title = "Gym Booking API",
        version = "1.0.0",
        description = "RESTful API for coach availability and booking lifecycle",
        contact(
            name = "API Support",
            email = "support@gymapi.com"
        )
    )
)]
struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub catalog_service: CatalogService,
    pub availability_service: AvailabilityService,
    pub booking_service: BookingService,
    pub feedback_service: FeedbackService,
}

/// Handler for GET /api/slots
/// Retrieves the fixed slot catalog in chronological order
#[utoipa::path(
    get,
    path = "/api/slots",
    responses(
        (status = 200, description = "List of all time slots", body = Vec<TimeSlot>),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "catalog"
)]
async fn get_all_slots(State(state): State<AppState>) -> Result<Json<Vec<TimeSlot>>, ApiError> {
    tracing::debug!("Fetching all time slots");

    let slots = state
        .catalog_service
        .list_slots()
        .await
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    tracing::debug!("Retrieved {} time slots", slots.len());
    Ok(Json(slots))
}

/// Handler for GET /api/coaches
/// Retrieves all coaches with their current mean ratings
#[utoipa::path(
    get,
    path = "/api/coaches",
    responses(
        (status = 200, description = "List of all coaches", body = Vec<CoachProfile>),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "catalog"
)]
async fn get_all_coaches(
    State(state): State<AppState>,
) -> Result<Json<Vec<CoachProfile>>, ApiError> {
    tracing::debug!("Fetching all coaches");

    let coaches = db::list_coaches(&state.db).await?;

    tracing::debug!("Retrieved {} coaches", coaches.len());
    Ok(Json(coaches))
}

/// Handler for GET /api/coaches/:id
/// Retrieves a specific coach by ID
#[utoipa::path(
    get,
    path = "/api/coaches/{id}",
    params(
        ("id" = i32, Path, description = "Coach ID")
    ),
    responses(
        (status = 200, description = "Coach found", body = CoachProfile),
        (status = 404, description = "Coach not found", body = String, example = json!({"error": "Coach with id 1 not found"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "catalog"
)]
async fn get_coach_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CoachProfile>, ApiError> {
    tracing::debug!("Fetching coach with id: {}", id);

    let coach = db::find_coach(&state.db, id).await?.ok_or_else(|| {
        tracing::debug!("Coach with id {} not found", id);
        ApiError::NotFound {
            resource: "Coach".to_string(),
            id: id.to_string(),
        }
    })?;

    tracing::debug!("Successfully retrieved coach: {}", coach.name);
    Ok(Json(coach))
}

/// Builds the shared application state from a connection pool
fn build_state(db: PgPool) -> AppState {
    let slot_repository = SlotCatalogRepository::new(db.clone());
    let workout_repository = WorkoutRepository::new(db.clone());
    let bookings_repository = BookingsRepository::new(db.clone());
    let feedback_repository = FeedbackRepository::new(db.clone());

    let catalog_service =
        CatalogService::new(slot_repository.clone(), workout_repository.clone());
    let availability_service = AvailabilityService::new(
        db.clone(),
        slot_repository.clone(),
        workout_repository.clone(),
        bookings_repository.clone(),
    );
    let booking_service = BookingService::new(
        bookings_repository,
        slot_repository,
        workout_repository,
    );
    let feedback_service = FeedbackService::new(feedback_repository);

    AppState {
        db,
        catalog_service,
        availability_service,
        booking_service,
        feedback_service,
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let state = build_state(db);

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Catalog
        .route("/api/slots", get(get_all_slots))
        .route("/api/workouts", get(catalog::list_workouts_handler))
        .route("/api/workouts", post(catalog::create_workout_handler))
        .route(
            "/api/workouts/:id/coaches",
            get(catalog::list_workout_coaches_handler),
        )
        // Coaches
        .route("/api/coaches", get(get_all_coaches))
        .route("/api/coaches/:id", get(get_coach_by_id))
        .route(
            "/api/coaches/:id/workouts",
            get(catalog::list_coach_workouts_handler),
        )
        .route(
            "/api/coaches/:id/specializations",
            put(catalog::set_specializations_handler),
        )
        .route(
            "/api/coaches/:id/availability",
            get(availability::get_availability_handler),
        )
        .route(
            "/api/coaches/:id/feedback",
            get(feedback::list_coach_feedback_handler),
        )
        // Search
        .route("/api/search", get(availability::search_handler))
        // Bookings
        .route("/api/bookings", post(bookings::create_booking_handler))
        .route("/api/bookings", get(bookings::list_bookings_handler))
        .route(
            "/api/bookings/:id/cancel",
            post(bookings::cancel_booking_handler),
        )
        .route(
            "/api/bookings/:id/feedback",
            post(feedback::submit_feedback_handler),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    // This enables the error!, warn!, info!, debug!, and trace! macros
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Gym Booking API - Starting...");

    // Get configuration from environment variables
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST")
        .unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // An empty slot catalog means seeding failed; refuse to start rather
    // than serve an API that can never book anything.
    let catalog_check = CatalogService::new(
        SlotCatalogRepository::new(db_pool.clone()),
        WorkoutRepository::new(db_pool.clone()),
    );
    catalog_check
        .assert_catalog_seeded()
        .await
        .expect("Slot catalog is empty; check that migrations ran");

    // Create the application router
    let app = create_router(db_pool);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Gym Booking API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
