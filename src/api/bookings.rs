//! Booking lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::booking::{
        Booking, CancelBooking, CreateBooking, ModifyBooking, PriceQuote, QuoteRequest,
        UserBookingsQuery,
    },
};

/// Cancellation response with the computed refund
#[derive(Serialize, ToSchema)]
pub struct CancelResponse {
    pub status: String,
    pub refund_amount: rust_decimal::Decimal,
    pub booking: Booking,
}

/// Price an interval without booking it
#[utoipa::path(
    post,
    path = "/fields/{id}/quote",
    tag = "bookings",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Price breakdown", body = PriceQuote),
        (status = 400, description = "Invalid interval"),
        (status = 404, description = "Field or user not found")
    )
)]
pub async fn quote(
    State(state): State<crate::AppState>,
    Path(field_id): Path<Uuid>,
    Json(request): Json<QuoteRequest>,
) -> AppResult<Json<PriceQuote>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let quote = state
        .services
        .bookings
        .quote(field_id, &request, Utc::now())
        .await?;
    Ok(Json(quote))
}

/// Create a booking
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = CreateBooking,
    responses(
        (status = 201, description = "Booking created", body = Booking),
        (status = 400, description = "Gate rejected the request"),
        (status = 404, description = "Field or user not found"),
        (status = 409, description = "Slot already taken", body = crate::error::ErrorResponse),
        (status = 422, description = "Field unavailable")
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBooking>,
) -> AppResult<(StatusCode, Json<Booking>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = state
        .services
        .bookings
        .create_booking(request, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get booking details by ID
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking details", body = Booking),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state.services.bookings.get_booking(id).await?;
    Ok(Json(booking))
}

/// Move a booking to a new interval
#[utoipa::path(
    put,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = ModifyBooking,
    responses(
        (status = 200, description = "Booking updated", body = Booking),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "New slot taken or booking immutable"),
        (status = 422, description = "Modification window closed")
    )
)]
pub async fn modify_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ModifyBooking>,
) -> AppResult<Json<Booking>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = state
        .services
        .bookings
        .modify_booking(id, request, Utc::now())
        .await?;
    Ok(Json(booking))
}

/// Cancel a booking
#[utoipa::path(
    post,
    path = "/bookings/{id}/cancel",
    tag = "bookings",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    request_body = CancelBooking,
    responses(
        (status = 200, description = "Booking cancelled", body = CancelResponse),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Already cancelled")
    )
)]
pub async fn cancel_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CancelBooking>,
) -> AppResult<Json<CancelResponse>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let booking = state
        .services
        .bookings
        .cancel_booking(id, request, Utc::now())
        .await?;

    Ok(Json(CancelResponse {
        status: "cancelled".to_string(),
        refund_amount: booking.refund_amount.unwrap_or_default(),
        booking,
    }))
}

/// Confirm a pending booking (staff action)
#[utoipa::path(
    post,
    path = "/bookings/{id}/confirm",
    tag = "bookings",
    params(
        ("id" = Uuid, Path, description = "Booking ID")
    ),
    responses(
        (status = 200, description = "Booking confirmed", body = Booking),
        (status = 404, description = "Booking not found"),
        (status = 422, description = "Not in a confirmable state")
    )
)]
pub async fn confirm_booking(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Booking>> {
    let booking = state
        .services
        .bookings
        .confirm_booking(id, Utc::now())
        .await?;
    Ok(Json(booking))
}

/// Get bookings for a specific user
#[utoipa::path(
    get,
    path = "/users/{id}/bookings",
    tag = "bookings",
    params(
        ("id" = Uuid, Path, description = "User ID"),
        UserBookingsQuery
    ),
    responses(
        (status = 200, description = "User's bookings", body = Vec<Booking>),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_bookings(
    State(state): State<crate::AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<UserBookingsQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let bookings = state
        .services
        .bookings
        .get_user_bookings(user_id, &query)
        .await?;
    Ok(Json(bookings))
}
