//! Availability endpoint

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    engine::availability::AvailabilitySlot,
    error::{AppError, AppResult},
};

/// Query parameters for the availability grid
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// Target date (YYYY-MM-DD)
    pub date: String,
    /// Slot length in minutes; the configured default when omitted
    pub duration: Option<i32>,
}

/// Availability response for one field and day
#[derive(Serialize, ToSchema)]
pub struct AvailabilityResponse {
    pub field_id: Uuid,
    pub date: NaiveDate,
    pub duration_minutes: i32,
    pub slots: Vec<AvailabilitySlot>,
}

/// Candidate slots for a field on a day
#[utoipa::path(
    get,
    path = "/fields/{id}/availability",
    tag = "availability",
    params(
        ("id" = Uuid, Path, description = "Field ID"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Slot grid for the day", body = AvailabilityResponse),
        (status = 400, description = "Invalid date or duration"),
        (status = 404, description = "Field not found")
    )
)]
pub async fn get_availability(
    State(state): State<crate::AppState>,
    Path(field_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<Json<AvailabilityResponse>> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date (use YYYY-MM-DD)".to_string()))?;
    let duration_minutes = query
        .duration
        .unwrap_or(state.config.booking.default_slot_minutes);

    let slots = state
        .services
        .availability
        .day_availability(field_id, date, duration_minutes, Utc::now())
        .await?;

    Ok(Json(AvailabilityResponse {
        field_id,
        date,
        duration_minutes,
        slots,
    }))
}
