//! Availability service: slot grid for one field and day

use chrono::{DateTime, NaiveDate, Utc};

use crate::{
    engine::availability::{mark_availability, AvailabilitySlot, SlotGrid},
    error::AppResult,
    repository::Repository,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Candidate slots of `duration_minutes` for a field on a day, each
    /// flagged free or taken against the live bookings
    pub async fn day_availability(
        &self,
        field_id: Uuid,
        date: NaiveDate,
        duration_minutes: i32,
        now: DateTime<Utc>,
    ) -> AppResult<Vec<AvailabilitySlot>> {
        let field = self.repository.fields.get_by_id(field_id).await?;

        let grid = SlotGrid::new(&field, date, duration_minutes, now)?;
        let day_start = date.and_time(field.available_from).and_utc();
        let day_end = date.and_time(field.available_until).and_utc();

        let bookings = self
            .repository
            .bookings
            .list_live_for_field(field_id, day_start, day_end)
            .await?;

        Ok(mark_availability(grid, &bookings))
    }
}
