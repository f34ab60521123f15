//! Organizations repository for database operations

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Organization,
};

#[derive(Clone)]
pub struct OrganizationsRepository {
    pool: Pool<Postgres>,
}

impl OrganizationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get organization by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Organization {} not found", id)))
    }
}
