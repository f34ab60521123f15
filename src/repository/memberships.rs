//! Memberships repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::Membership};

#[derive(Clone)]
pub struct MembershipsRepository {
    pool: Pool<Postgres>,
}

impl MembershipsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a user's membership within an organization, if any. Status and
    /// expiry are judged by the pricing engine, not filtered here.
    pub async fn get_for_user(
        &self,
        organization_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Membership>> {
        let row = sqlx::query_as::<_, Membership>(
            "SELECT * FROM memberships WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
