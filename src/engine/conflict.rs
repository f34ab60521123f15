//! Half-open interval conflict detection.
//!
//! Two intervals `[s1, e1)` and `[s2, e2)` conflict iff `s1 < e2 && e1 > s2`;
//! back-to-back bookings sharing a boundary instant do not. Only PENDING and
//! CONFIRMED bookings occupy their slot.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::Booking;

/// Half-open interval overlap test
pub fn overlaps(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s1 < e2 && e1 > s2
}

/// Return the live bookings whose interval overlaps `[start, end)`.
///
/// `exclude` skips a booking's own row when re-checking during modification.
pub fn find_conflicts<'a>(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bookings: &'a [Booking],
    exclude: Option<Uuid>,
) -> Vec<&'a Booking> {
    bookings
        .iter()
        .filter(|b| b.status.is_live())
        .filter(|b| exclude != Some(b.id))
        .filter(|b| overlaps(start, end, b.start_time, b.end_time))
        .collect()
}

/// Convenience: ids of the conflicting bookings, for error payloads
pub fn conflicting_ids(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    bookings: &[Booking],
    exclude: Option<Uuid>,
) -> Vec<Uuid> {
    find_conflicts(start, end, bookings, exclude)
        .into_iter()
        .map(|b| b.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{test_booking, test_field};
    use crate::models::enums::BookingStatus;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn overlapping_intervals_conflict() {
        assert!(overlaps(at(10), at(12), at(11), at(13)));
        assert!(overlaps(at(10), at(12), at(9), at(11)));
        // containment both ways
        assert!(overlaps(at(10), at(12), at(10), at(11)));
        assert!(overlaps(at(10), at(12), at(9), at(13)));
    }

    #[test]
    fn adjacent_intervals_do_not_conflict() {
        // [10, 11) then [11, 12): the boundary instant belongs to the second
        assert!(!overlaps(at(10), at(11), at(11), at(12)));
        assert!(!overlaps(at(11), at(12), at(10), at(11)));
    }

    #[test]
    fn cancelled_and_completed_never_conflict() {
        let field = test_field();
        let bookings = vec![
            test_booking(&field, at(10), at(11), BookingStatus::Cancelled),
            test_booking(&field, at(10), at(11), BookingStatus::Completed),
        ];
        assert!(find_conflicts(at(10), at(11), &bookings, None).is_empty());
    }

    #[test]
    fn pending_and_confirmed_conflict() {
        let field = test_field();
        let bookings = vec![
            test_booking(&field, at(10), at(11), BookingStatus::Pending),
            test_booking(&field, at(12), at(13), BookingStatus::Confirmed),
        ];
        let hits = find_conflicts(at(10), at(13), &bookings, None);
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn exclusion_skips_own_row() {
        let field = test_field();
        let existing = test_booking(&field, at(10), at(11), BookingStatus::Confirmed);
        let id = existing.id;
        let bookings = vec![existing];

        // Shifting the same booking 30 minutes later must not collide with itself
        let new_start = at(10) + Duration::minutes(30);
        let new_end = at(11) + Duration::minutes(30);
        assert!(find_conflicts(new_start, new_end, &bookings, Some(id)).is_empty());
        assert_eq!(find_conflicts(new_start, new_end, &bookings, None).len(), 1);
    }

    #[test]
    fn conflicting_ids_reports_every_overlap() {
        let field = test_field();
        let b1 = test_booking(&field, at(10), at(11), BookingStatus::Pending);
        let b2 = test_booking(&field, at(11), at(12), BookingStatus::Confirmed);
        let expected = vec![b1.id, b2.id];
        let bookings = vec![b1, b2];

        let ids = conflicting_ids(at(10), at(12), &bookings, None);
        assert_eq!(ids, expected);
    }
}
