use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use rentora_booking::Actor;
use rentora_core::models::{BookingDetail, BookingSummary, CreateBooking, StatusChange};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::{customer_auth_middleware, AuthUser};
use crate::state::AppState;

/// Renter-facing routes.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, customer_auth_middleware))
}

/// POST /v1/bookings
async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateBooking>,
) -> Result<(StatusCode, Json<BookingDetail>), AppError> {
    let detail = state.bookings.create_booking(user.id, req).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /v1/bookings
async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<BookingSummary>>, AppError> {
    let bookings = state.bookings.list_bookings_for_renter(user.id).await?;
    Ok(Json(bookings))
}

/// GET /v1/bookings/{id}
async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingDetail>, AppError> {
    let detail = state
        .bookings
        .get_booking_detail(Actor::Renter(user.id), booking_id)
        .await?;
    Ok(Json(detail))
}

/// POST /v1/bookings/{id}/cancel
async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<StatusChange>, AppError> {
    let change = state
        .bookings
        .cancel_booking(Actor::Renter(user.id), booking_id)
        .await?;
    Ok(Json(change))
}
