use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, patch, post},
    Extension, Json, Router,
};
use rentora_booking::Actor;
use rentora_core::models::{BookingDetail, BookingStatus, BookingSummary, CustomerInfo, StatusChange};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::{hoster_auth_middleware, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

/// Routes for hosters managing bookings of their items.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/hoster/bookings", get(list_bookings))
        .route("/v1/hoster/bookings/{id}", get(get_booking))
        .route("/v1/hoster/bookings/{id}/status", patch(update_status))
        .route("/v1/hoster/bookings/{id}/cancel", post(cancel_booking))
        .route("/v1/hoster/customers", get(list_customers))
        .route_layer(middleware::from_fn_with_state(state, hoster_auth_middleware))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(hoster): Extension<AuthUser>,
) -> Result<Json<Vec<BookingSummary>>, AppError> {
    Ok(Json(state.bookings.list_bookings_for_owner(hoster.id).await?))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(hoster): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingDetail>, AppError> {
    let detail = state
        .bookings
        .get_booking_detail(Actor::Hoster(hoster.id), booking_id)
        .await?;
    Ok(Json(detail))
}

/// PATCH /v1/hoster/bookings/{id}/status
async fn update_status(
    State(state): State<AppState>,
    Extension(hoster): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<StatusChange>, AppError> {
    let change = state
        .bookings
        .transition_booking_status(hoster.id, booking_id, req.status)
        .await?;
    Ok(Json(change))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(hoster): Extension<AuthUser>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<StatusChange>, AppError> {
    let change = state
        .bookings
        .cancel_booking(Actor::Hoster(hoster.id), booking_id)
        .await?;
    Ok(Json(change))
}

async fn list_customers(
    State(state): State<AppState>,
    Extension(hoster): Extension<AuthUser>,
) -> Result<Json<Vec<CustomerInfo>>, AppError> {
    Ok(Json(state.bookings.list_distinct_customers_for_owner(hoster.id).await?))
}
