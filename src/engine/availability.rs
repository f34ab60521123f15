//! Availability calculator: candidate slot grid for one field and day.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::{Booking, Field};

use super::conflict;

/// A candidate slot, `[start_time, end_time)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// A candidate slot with its availability flag, as served to clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AvailabilitySlot {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub available: bool,
}

/// Finite, restartable iterator over the whole slots of one day.
///
/// Steps `duration` from `available_from`; a trailing partial slot is dropped.
/// Slots starting at or before `now` are skipped, so "today" only yields
/// future slots. Clone to restart.
#[derive(Debug, Clone)]
pub struct SlotGrid {
    cursor: DateTime<Utc>,
    day_end: DateTime<Utc>,
    step: Duration,
    now: DateTime<Utc>,
}

impl SlotGrid {
    pub fn new(
        field: &Field,
        date: NaiveDate,
        duration_minutes: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Self> {
        if duration_minutes <= 0 {
            return Err(AppError::InvalidDuration(format!(
                "slot duration must be positive, got {} minutes",
                duration_minutes
            )));
        }

        Ok(Self {
            cursor: date.and_time(field.available_from).and_utc(),
            day_end: date.and_time(field.available_until).and_utc(),
            step: Duration::minutes(duration_minutes as i64),
            now,
        })
    }
}

impl Iterator for SlotGrid {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        while self.cursor + self.step <= self.day_end {
            let start_time = self.cursor;
            self.cursor += self.step;
            if start_time > self.now {
                return Some(Slot {
                    start_time,
                    end_time: start_time + self.step,
                });
            }
        }
        None
    }
}

/// Intersect a slot grid with the day's bookings, flagging each slot free or
/// taken. Only live bookings block a slot.
pub fn mark_availability(
    grid: SlotGrid,
    bookings: &[Booking],
) -> Vec<AvailabilitySlot> {
    grid.map(|slot| {
        let taken = conflict::find_conflicts(slot.start_time, slot.end_time, bookings, None);
        AvailabilitySlot {
            start_time: slot.start_time,
            end_time: slot.end_time,
            available: taken.is_empty(),
        }
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{test_booking, test_field};
    use crate::models::enums::BookingStatus;
    use chrono::TimeZone;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn long_ago() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn grid_covers_operating_hours_in_whole_slots() {
        // 08:00-22:00 at 60 minutes = 14 slots
        let field = test_field();
        let grid = SlotGrid::new(&field, day(), 60, long_ago()).unwrap();
        let slots: Vec<_> = grid.collect();
        assert_eq!(slots.len(), 14);
        assert_eq!(
            slots[0].start_time,
            Utc.with_ymd_and_hms(2026, 6, 15, 8, 0, 0).unwrap()
        );
        assert_eq!(
            slots[13].end_time,
            Utc.with_ymd_and_hms(2026, 6, 15, 22, 0, 0).unwrap()
        );
    }

    #[test]
    fn trailing_partial_slot_is_dropped() {
        // 14 hours at 90 minutes = 9 whole slots, 30 minutes left over
        let field = test_field();
        let slots: Vec<_> = SlotGrid::new(&field, day(), 90, long_ago()).unwrap().collect();
        assert_eq!(slots.len(), 9);
        assert_eq!(
            slots[8].end_time,
            Utc.with_ymd_and_hms(2026, 6, 15, 21, 30, 0).unwrap()
        );
    }

    #[test]
    fn zero_or_negative_duration_is_rejected() {
        let field = test_field();
        assert!(matches!(
            SlotGrid::new(&field, day(), 0, long_ago()),
            Err(AppError::InvalidDuration(_))
        ));
        assert!(matches!(
            SlotGrid::new(&field, day(), -30, long_ago()),
            Err(AppError::InvalidDuration(_))
        ));
    }

    #[test]
    fn slots_at_or_before_now_are_skipped() {
        let field = test_field();
        // Midday: the 12:00 slot starts exactly "now" and is excluded too
        let now = Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap();
        let slots: Vec<_> = SlotGrid::new(&field, day(), 60, now).unwrap().collect();
        assert_eq!(
            slots[0].start_time,
            Utc.with_ymd_and_hms(2026, 6, 15, 13, 0, 0).unwrap()
        );
        assert_eq!(slots.len(), 9);
    }

    #[test]
    fn grid_is_restartable() {
        let field = test_field();
        let grid = SlotGrid::new(&field, day(), 60, long_ago()).unwrap();
        let first: Vec<_> = grid.clone().collect();
        let second: Vec<_> = grid.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn booked_slots_are_marked_unavailable() {
        let field = test_field();
        let b_start = Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).unwrap();
        let b_end = Utc.with_ymd_and_hms(2026, 6, 15, 11, 0, 0).unwrap();
        let bookings = vec![test_booking(&field, b_start, b_end, BookingStatus::Confirmed)];

        let grid = SlotGrid::new(&field, day(), 60, long_ago()).unwrap();
        let slots = mark_availability(grid, &bookings);

        for slot in &slots {
            if slot.start_time == b_start {
                assert!(!slot.available);
            } else {
                assert!(slot.available, "slot {} should be free", slot.start_time);
            }
        }
    }

    #[test]
    fn cancelled_booking_does_not_block_slot() {
        let field = test_field();
        let b_start = Utc.with_ymd_and_hms(2026, 6, 15, 10, 0, 0).unwrap();
        let b_end = Utc.with_ymd_and_hms(2026, 6, 15, 11, 0, 0).unwrap();
        let bookings = vec![test_booking(&field, b_start, b_end, BookingStatus::Cancelled)];

        let grid = SlotGrid::new(&field, day(), 60, long_ago()).unwrap();
        let slots = mark_availability(grid, &bookings);
        assert!(slots.iter().all(|s| s.available));
    }

    #[test]
    fn half_overlapping_booking_blocks_both_slots() {
        let field = test_field();
        // 10:30-11:30 straddles the 10:00 and 11:00 hour slots
        let b_start = Utc.with_ymd_and_hms(2026, 6, 15, 10, 30, 0).unwrap();
        let b_end = Utc.with_ymd_and_hms(2026, 6, 15, 11, 30, 0).unwrap();
        let bookings = vec![test_booking(&field, b_start, b_end, BookingStatus::Pending)];

        let grid = SlotGrid::new(&field, day(), 60, long_ago()).unwrap();
        let slots = mark_availability(grid, &bookings);
        let blocked: Vec<_> = slots.iter().filter(|s| !s.available).collect();
        assert_eq!(blocked.len(), 2);
    }
}
