// HTTP handlers for booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::AuthenticatedUser;
use crate::bookings::{BookingError, BookingResponse, CreateBookingRequest};
use crate::models::Role;

/// Query parameters for the booking list
#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    /// Restrict the list to one calendar day (ISO date or bare day-of-month)
    pub date: Option<String>,
}

/// Handler for POST /api/bookings
/// Books a slot for the authenticated client
pub async fn create_booking_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), BookingError> {
    if user.role != Role::Client {
        return Err(BookingError::Forbidden(
            "Only clients may book sessions".to_string(),
        ));
    }

    let booking = state.booking_service.book_slot(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Handler for GET /api/bookings
/// Lists the authenticated client's bookings, optionally filtered to a day
pub async fn list_bookings_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingResponse>>, BookingError> {
    let bookings = match query.date {
        Some(date) => {
            state
                .booking_service
                .list_bookings_for_day(user.user_id, &date)
                .await?
        }
        None => state.booking_service.list_bookings_for_user(user.user_id).await?,
    };

    Ok(Json(bookings))
}

/// Handler for POST /api/bookings/{id}/cancel
pub async fn cancel_booking_handler(
    State(state): State<crate::AppState>,
    user: AuthenticatedUser,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, BookingError> {
    let booking = state
        .booking_service
        .cancel_booking(user.user_id, booking_id)
        .await?;

    Ok(Json(booking))
}
