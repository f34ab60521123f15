//! Fields repository for database operations

use chrono::{NaiveTime, Utc};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::field::{CreateField, Field, UpdateField},
};

#[derive(Clone)]
pub struct FieldsRepository {
    pool: Pool<Postgres>,
}

fn parse_time(value: &str, name: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", name)))
}

impl FieldsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get field by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Field> {
        sqlx::query_as::<_, Field>("SELECT * FROM fields WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Field {} not found", id)))
    }

    /// List fields of an organization, active first
    pub async fn list(&self, organization_id: Option<Uuid>) -> AppResult<Vec<Field>> {
        let rows = match organization_id {
            Some(org) => {
                sqlx::query_as::<_, Field>(
                    "SELECT * FROM fields WHERE organization_id = $1 ORDER BY is_active DESC, name",
                )
                .bind(org)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Field>("SELECT * FROM fields ORDER BY is_active DESC, name")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Create a field
    pub async fn create(&self, data: &CreateField) -> AppResult<Field> {
        let available_from = parse_time(&data.available_from, "available_from")?;
        let available_until = parse_time(&data.available_until, "available_until")?;
        if available_until <= available_from {
            return Err(AppError::Validation(
                "available_until must be after available_from".to_string(),
            ));
        }

        let peak_start = data
            .peak_start
            .as_deref()
            .map(|s| parse_time(s, "peak_start"))
            .transpose()?;
        let peak_end = data
            .peak_end
            .as_deref()
            .map(|s| parse_time(s, "peak_end"))
            .transpose()?;

        let row = sqlx::query_as::<_, Field>(
            r#"
            INSERT INTO fields (
                organization_id, name, sport, hourly_rate, peak_hour_rate,
                peak_start, peak_end, member_discount_percent,
                min_booking_minutes, max_booking_minutes,
                advance_booking_days, cancellation_hours,
                available_from, available_until
            )
            VALUES (
                $1, $2, $3, $4, $5,
                COALESCE($6, '17:00'::time), COALESCE($7, '21:00'::time), COALESCE($8, 0),
                COALESCE($9, 60), COALESCE($10, 120),
                COALESCE($11, 14), COALESCE($12, 24),
                $13, $14
            )
            RETURNING *
            "#,
        )
        .bind(data.organization_id)
        .bind(&data.name)
        .bind(&data.sport)
        .bind(data.hourly_rate)
        .bind(data.peak_hour_rate)
        .bind(peak_start)
        .bind(peak_end)
        .bind(data.member_discount_percent)
        .bind(data.min_booking_minutes)
        .bind(data.max_booking_minutes)
        .bind(data.advance_booking_days)
        .bind(data.cancellation_hours)
        .bind(available_from)
        .bind(available_until)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Update a field; omitted request fields keep their current value
    pub async fn update(&self, id: Uuid, data: &UpdateField) -> AppResult<Field> {
        let available_from = data
            .available_from
            .as_deref()
            .map(|s| parse_time(s, "available_from"))
            .transpose()?;
        let available_until = data
            .available_until
            .as_deref()
            .map(|s| parse_time(s, "available_until"))
            .transpose()?;
        let peak_start = data
            .peak_start
            .as_deref()
            .map(|s| parse_time(s, "peak_start"))
            .transpose()?;
        let peak_end = data
            .peak_end
            .as_deref()
            .map(|s| parse_time(s, "peak_end"))
            .transpose()?;

        let row = sqlx::query_as::<_, Field>(
            r#"
            UPDATE fields SET
                name = COALESCE($2, name),
                hourly_rate = COALESCE($3, hourly_rate),
                peak_hour_rate = COALESCE($4, peak_hour_rate),
                peak_start = COALESCE($5, peak_start),
                peak_end = COALESCE($6, peak_end),
                member_discount_percent = COALESCE($7, member_discount_percent),
                min_booking_minutes = COALESCE($8, min_booking_minutes),
                max_booking_minutes = COALESCE($9, max_booking_minutes),
                advance_booking_days = COALESCE($10, advance_booking_days),
                cancellation_hours = COALESCE($11, cancellation_hours),
                available_from = COALESCE($12, available_from),
                available_until = COALESCE($13, available_until),
                is_active = COALESCE($14, is_active),
                updated_at = $15
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&data.name)
        .bind(data.hourly_rate)
        .bind(data.peak_hour_rate)
        .bind(peak_start)
        .bind(peak_end)
        .bind(data.member_discount_percent)
        .bind(data.min_booking_minutes)
        .bind(data.max_booking_minutes)
        .bind(data.advance_booking_days)
        .bind(data.cancellation_hours)
        .bind(available_from)
        .bind(available_until)
        .bind(data.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Field {} not found", id)))?;
        Ok(row)
    }

    /// Soft-delete a field by deactivating it; history stays intact
    pub async fn deactivate(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE fields SET is_active = FALSE, updated_at = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Field {} not found", id)));
        }
        Ok(())
    }
}
