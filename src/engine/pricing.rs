//! Pricing engine: base rate, peak surcharge, discount, tax.
//!
//! All monetary arithmetic is `rust_decimal::Decimal`; every component is
//! rounded half-up to 2 decimal places, so `total = base - discount + tax`
//! holds exactly at 2 decimals.

use chrono::{DateTime, Timelike, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Field, Membership};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Priced amounts for one booking interval
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub base_price: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Price a booking interval on a field.
///
/// Rules, in order: peak rate when any portion of the interval touches the
/// field's peak window; membership discount when ACTIVE and unexpired at
/// `now`, else the field's flat member discount for plain members, else
/// nothing; exactly one discount source applies. Tax on the discounted base.
pub fn price_booking(
    field: &Field,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    membership: Option<&Membership>,
    is_member: bool,
    tax_rate_percent: Decimal,
    now: DateTime<Utc>,
) -> PriceBreakdown {
    let minutes = (end_time - start_time).num_minutes();

    let rate = if touches_peak_window(field, start_time, minutes) {
        field.peak_hour_rate
    } else {
        field.hourly_rate
    };

    let base_price = round_money(rate * Decimal::from(minutes) / Decimal::from(60));

    let discount_percent = match membership {
        Some(m) if m.applies_at(now) => m.discount_percent,
        _ if is_member => field.member_discount_percent,
        _ => Decimal::ZERO,
    };
    let discount_amount = round_money(base_price * discount_percent / HUNDRED);

    let tax_amount = round_money((base_price - discount_amount) * tax_rate_percent / HUNDRED);

    PriceBreakdown {
        base_price,
        discount_amount,
        tax_amount,
        total_amount: base_price - discount_amount + tax_amount,
    }
}

/// Half-up rounding to exactly 2 decimal places
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// True when any portion of the interval's clock time falls inside
/// `[peak_start, peak_end)`. A window with `peak_start >= peak_end` is
/// treated as disabled.
fn touches_peak_window(field: &Field, start_time: DateTime<Utc>, minutes: i64) -> bool {
    let peak_start = minutes_from_midnight(field.peak_start);
    let peak_end = minutes_from_midnight(field.peak_end);
    if peak_start >= peak_end {
        return false;
    }
    let start = start_time.time().num_seconds_from_midnight() as i64 / 60;
    let end = start + minutes;
    start < peak_end && end > peak_start
}

fn minutes_from_midnight(t: chrono::NaiveTime) -> i64 {
    t.num_seconds_from_midnight() as i64 / 60
}
