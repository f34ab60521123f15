//! Refund calculator.
//!
//! Binary policy: cancelling at least `cancellation_hours` before start
//! refunds the full total, anything later refunds nothing. No tiers.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::models::{Booking, Field};

/// Refund owed for cancelling `booking` at `now`
pub fn refund_amount(booking: &Booking, field: &Field, now: DateTime<Utc>) -> Decimal {
    if booking.start_time - now >= Duration::hours(field.cancellation_hours as i64) {
        booking.total_amount
    } else {
        Decimal::ZERO
    }
}
