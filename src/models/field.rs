//! Field (court) model and related types

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Field model from database. Per-field booking policy lives here and is
/// read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Field {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    /// Sport played on this field (e.g. "tennis", "padel")
    pub sport: String,
    /// Off-peak rate per hour
    pub hourly_rate: Decimal,
    /// Rate per hour when any part of the booking touches the peak window
    pub peak_hour_rate: Decimal,
    pub peak_start: NaiveTime,
    pub peak_end: NaiveTime,
    /// Flat discount applied to plain members without a membership record
    pub member_discount_percent: Decimal,
    pub min_booking_minutes: i32,
    pub max_booking_minutes: i32,
    /// How far ahead bookings may be placed
    pub advance_booking_days: i32,
    /// Window gating both free cancellation and modification
    pub cancellation_hours: i32,
    pub available_from: NaiveTime,
    pub available_until: NaiveTime,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create field request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateField {
    pub organization_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(min = 1, max = 40))]
    pub sport: String,
    pub hourly_rate: Decimal,
    pub peak_hour_rate: Decimal,
    /// Peak window start (HH:MM)
    pub peak_start: Option<String>,
    /// Peak window end (HH:MM)
    pub peak_end: Option<String>,
    pub member_discount_percent: Option<Decimal>,
    #[validate(range(min = 1))]
    pub min_booking_minutes: Option<i32>,
    #[validate(range(min = 1))]
    pub max_booking_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub advance_booking_days: Option<i32>,
    #[validate(range(min = 0))]
    pub cancellation_hours: Option<i32>,
    /// Opening time (HH:MM)
    pub available_from: String,
    /// Closing time (HH:MM)
    pub available_until: String,
}

/// Update field request; omitted fields are left unchanged
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateField {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub peak_hour_rate: Option<Decimal>,
    pub peak_start: Option<String>,
    pub peak_end: Option<String>,
    pub member_discount_percent: Option<Decimal>,
    #[validate(range(min = 1))]
    pub min_booking_minutes: Option<i32>,
    #[validate(range(min = 1))]
    pub max_booking_minutes: Option<i32>,
    #[validate(range(min = 0))]
    pub advance_booking_days: Option<i32>,
    #[validate(range(min = 0))]
    pub cancellation_hours: Option<i32>,
    pub available_from: Option<String>,
    pub available_until: Option<String>,
    pub is_active: Option<bool>,
}
