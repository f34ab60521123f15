//! Bookings repository for database operations.
//!
//! Creation and modification run their conflict check inside a SERIALIZABLE
//! transaction together with the write, and the schema carries a gist
//! exclusion constraint over `(field_id, tstzrange(start_time, end_time))`
//! for live rows. Either mechanism alone closes the check-then-insert race;
//! together a contested slot is won by exactly one request.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, UserBookingsQuery},
    models::enums::PaymentStatus,
};

/// Column values for a booking insert, already priced and gate-checked
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub id: Uuid,
    pub field_id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub base_price: Decimal,
    pub discount_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get booking by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Get booking by ID if it exists (idempotent-create lookup)
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Live (PENDING/CONFIRMED) bookings of a field overlapping `[from, until)`
    pub async fn list_live_for_field(
        &self,
        field_id: Uuid,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE field_id = $1
              AND status IN ('PENDING', 'CONFIRMED')
              AND start_time < $3 AND end_time > $2
            ORDER BY start_time
            "#,
        )
        .bind(field_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// A user's bookings with optional window and status filters
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
        query: &UserBookingsQuery,
    ) -> AppResult<Vec<Booking>> {
        let mut conditions = vec!["user_id = $1".to_string()];
        let mut idx = 2;

        if query.from.is_some() {
            conditions.push(format!("start_time >= ${}", idx));
            idx += 1;
        }
        if query.until.is_some() {
            conditions.push(format!("start_time < ${}", idx));
            idx += 1;
        }
        if query.status.is_some() {
            conditions.push(format!("status = ${}", idx));
        }

        let sql = format!(
            "SELECT * FROM bookings WHERE {} ORDER BY start_time DESC",
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Booking>(&sql).bind(user_id);
        if let Some(from) = query.from {
            builder = builder.bind(from);
        }
        if let Some(until) = query.until {
            builder = builder.bind(until);
        }
        if let Some(status) = query.status {
            builder = builder.bind(status);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Insert a booking after a conflict check, both inside one SERIALIZABLE
    /// transaction. Returns `SlotUnavailable` with the occupying booking ids
    /// when the slot is taken.
    pub async fn create_atomic(&self, new: &NewBooking) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let conflicts = conflicting_ids(&mut tx, new.field_id, new.start_time, new.end_time, None).await?;
        if !conflicts.is_empty() {
            return Err(AppError::SlotUnavailable { conflicts });
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                id, field_id, user_id, organization_id, start_time, end_time,
                status, payment_status,
                base_price, discount_amount, tax_amount, total_amount, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING', 'PENDING', $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(new.id)
        .bind(new.field_id)
        .bind(new.user_id)
        .bind(new.organization_id)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.base_price)
        .bind(new.discount_amount)
        .bind(new.tax_amount)
        .bind(new.total_amount)
        .bind(&new.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Move a booking to a new interval with fresh prices, conflict-checked
    /// against every live booking but its own row, in one SERIALIZABLE
    /// transaction.
    pub async fn reschedule_atomic(
        &self,
        id: Uuid,
        field_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        base_price: Decimal,
        discount_amount: Decimal,
        tax_amount: Decimal,
        total_amount: Decimal,
        notes: Option<&str>,
    ) -> AppResult<Booking> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await?;

        let conflicts = conflicting_ids(&mut tx, field_id, start_time, end_time, Some(id)).await?;
        if !conflicts.is_empty() {
            return Err(AppError::SlotUnavailable { conflicts });
        }

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                start_time = $2,
                end_time = $3,
                base_price = $4,
                discount_amount = $5,
                tax_amount = $6,
                total_amount = $7,
                notes = COALESCE($8, notes),
                updated_at = $9
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(start_time)
        .bind(end_time)
        .bind(base_price)
        .bind(discount_amount)
        .bind(tax_amount)
        .bind(total_amount)
        .bind(notes)
        .bind(Utc::now())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;

        tx.commit().await?;
        Ok(booking)
    }

    /// Record a cancellation: status, actor, reason, timestamp and the refund
    /// computed once. The status guard keeps a raced double-cancel from
    /// overwriting the stored refund.
    pub async fn cancel(
        &self,
        id: Uuid,
        cancelled_by: Uuid,
        reason: Option<&str>,
        refund: Decimal,
        now: DateTime<Utc>,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                status = 'CANCELLED',
                cancelled_at = $2,
                cancelled_by = $3,
                cancellation_reason = $4,
                refund_amount = $5,
                updated_at = $2
            WHERE id = $1 AND status <> 'CANCELLED'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(now)
        .bind(cancelled_by)
        .bind(reason)
        .bind(refund)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::AlreadyCancelled)
    }

    /// PENDING → CONFIRMED; any other current state leaves no row to update
    pub async fn confirm(&self, id: Uuid) -> AppResult<Option<Booking>> {
        let row = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = 'CONFIRMED', updated_at = $2
            WHERE id = $1 AND status = 'PENDING'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Record the payment outcome on the booking
    pub async fn set_payment_status(
        &self,
        id: Uuid,
        status: PaymentStatus,
        intent_id: Option<&str>,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET
                payment_status = $2,
                payment_intent_id = COALESCE($3, payment_intent_id),
                updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(intent_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }
}

/// Ids of live bookings overlapping `[start, end)` on a field, inside the
/// caller's transaction so the subsequent write sees the same snapshot.
async fn conflicting_ids(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    field_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> AppResult<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id FROM bookings
        WHERE field_id = $1
          AND status IN ('PENDING', 'CONFIRMED')
          AND start_time < $3 AND end_time > $2
          AND ($4::uuid IS NULL OR id <> $4)
        ORDER BY start_time
        "#,
    )
    .bind(field_id)
    .bind(start_time)
    .bind(end_time)
    .bind(exclude)
    .fetch_all(&mut **tx)
    .await?;
    Ok(ids)
}
