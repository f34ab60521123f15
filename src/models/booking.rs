//! Booking model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::enums::{BookingStatus, PaymentStatus};

/// Booking model from database. Interval is half-open `[start_time, end_time)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub field_id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// Opaque key into the payment gateway, set once an intent exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    pub base_price: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub refund_amount: Option<Decimal>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<Uuid>,
    pub cancellation_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBooking {
    /// Client-supplied booking ID; retries with the same ID are idempotent
    pub booking_id: Option<Uuid>,
    pub field_id: Uuid,
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Modify booking request; only the interval and notes can change
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ModifyBooking {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
}

/// Cancel booking request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CancelBooking {
    /// User performing the cancellation (booking owner or staff)
    pub cancelled_by: Uuid,
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

/// Price quote request (no side effects)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct QuoteRequest {
    pub user_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Priced amounts for a booking interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PriceQuote {
    pub base_price: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
}

/// Query parameters for a user's bookings
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct UserBookingsQuery {
    /// Only return bookings starting at or after this instant
    pub from: Option<DateTime<Utc>>,
    /// Only return bookings starting before this instant
    pub until: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}
