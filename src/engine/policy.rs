//! Temporal policy gates for the booking lifecycle.

use chrono::{DateTime, Duration, Timelike, Utc};

use crate::error::{AppError, AppResult};
use crate::models::{Booking, Field};

/// Check every creation gate, in order. Also applied when re-validating the
/// new interval of a modification.
pub fn check_creation(
    field: &Field,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> AppResult<()> {
    if !field.is_active {
        return Err(AppError::FieldUnavailable(field.name.clone()));
    }

    check_duration(field, start_time, end_time)?;

    if start_time <= now {
        return Err(AppError::PastBooking);
    }

    if start_time > now + Duration::days(field.advance_booking_days as i64) {
        return Err(AppError::AdvanceLimitExceeded {
            days: field.advance_booking_days,
        });
    }

    check_operating_hours(field, start_time, end_time)?;

    Ok(())
}

/// Duration must be positive and within the field's `[min, max]` minutes.
/// Also applied standalone when pricing a quote.
pub fn check_duration(
    field: &Field,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> AppResult<()> {
    if end_time <= start_time {
        return Err(AppError::InvalidDuration(
            "end time must be after start time".to_string(),
        ));
    }
    let minutes = (end_time - start_time).num_minutes();
    if minutes < field.min_booking_minutes as i64 || minutes > field.max_booking_minutes as i64 {
        return Err(AppError::InvalidDuration(format!(
            "duration must be between {} and {} minutes, got {}",
            field.min_booking_minutes, field.max_booking_minutes, minutes
        )));
    }
    Ok(())
}

/// The interval's clock time must lie within `[available_from,
/// available_until)`; ending exactly at closing time is allowed. A booking
/// spilling past midnight always fails here.
fn check_operating_hours(
    field: &Field,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> AppResult<()> {
    let open = minutes_from_midnight(field.available_from);
    let close = minutes_from_midnight(field.available_until);
    let start = start_time.time().num_seconds_from_midnight() as i64 / 60;
    let end = start + (end_time - start_time).num_minutes();

    if start < open || end > close {
        return Err(AppError::OutsideOperatingHours);
    }
    Ok(())
}

/// Gate shared by modification and free cancellation: the booking must be
/// mutable and at least `cancellation_hours` away.
pub fn check_modifiable(booking: &Booking, field: &Field, now: DateTime<Utc>) -> AppResult<()> {
    if booking.status.is_terminal() {
        return Err(AppError::BookingImmutable {
            status: booking.status.to_string(),
        });
    }
    if booking.start_time - now < Duration::hours(field.cancellation_hours as i64) {
        return Err(AppError::ModificationWindowClosed {
            hours: field.cancellation_hours,
        });
    }
    Ok(())
}

fn minutes_from_midnight(t: chrono::NaiveTime) -> i64 {
    t.num_seconds_from_midnight() as i64 / 60
}
