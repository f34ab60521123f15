//! Booking scheduling & pricing engine.
//!
//! Pure domain logic: no database handles, no clocks. Every function takes the
//! rows it needs plus an explicit `now`, so the whole module is deterministic
//! and unit-testable. Persistence-side enforcement (the serializable
//! conflict-check transaction and the exclusion constraint) lives in the
//! bookings repository.

pub mod availability;
pub mod conflict;
pub mod policy;
pub mod pricing;
pub mod refund;

pub use availability::{mark_availability, AvailabilitySlot, Slot, SlotGrid};
pub use conflict::{find_conflicts, overlaps};
pub use pricing::{price_booking, PriceBreakdown};
pub use refund::refund_amount;

#[cfg(test)]
pub(crate) mod testing {
    use chrono::{DateTime, NaiveTime, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use crate::models::enums::{BookingStatus, PaymentStatus};
    use crate::models::{Booking, Field};

    /// A tennis court open 08:00-22:00, 25/h off-peak, 35/h peak 17:00-21:00,
    /// 10% member discount, 60-120 minute bookings, 14-day advance window,
    /// 24h cancellation window.
    pub fn test_field() -> Field {
        let now = Utc::now();
        Field {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            name: "Court 1".to_string(),
            sport: "tennis".to_string(),
            hourly_rate: Decimal::from(25),
            peak_hour_rate: Decimal::from(35),
            peak_start: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            peak_end: NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
            member_discount_percent: Decimal::from(10),
            min_booking_minutes: 60,
            max_booking_minutes: 120,
            advance_booking_days: 14,
            cancellation_hours: 24,
            available_from: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            available_until: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn test_booking(
        field: &Field,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        status: BookingStatus,
    ) -> Booking {
        let now = Utc::now();
        Booking {
            id: Uuid::new_v4(),
            field_id: field.id,
            user_id: Uuid::new_v4(),
            organization_id: field.organization_id,
            start_time: start,
            end_time: end,
            status,
            payment_status: PaymentStatus::Pending,
            payment_intent_id: None,
            base_price: Decimal::from(25),
            discount_amount: Decimal::ZERO,
            tax_amount: "5.50".parse().unwrap(),
            total_amount: "30.50".parse().unwrap(),
            refund_amount: None,
            cancelled_at: None,
            cancelled_by: None,
            cancellation_reason: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}
