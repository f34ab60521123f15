//! Field catalog service

use uuid::Uuid;

use crate::{
    error::AppResult,
    models::field::{CreateField, Field, UpdateField},
    repository::Repository,
};

#[derive(Clone)]
pub struct FieldsService {
    repository: Repository,
}

impl FieldsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list_fields(&self, organization_id: Option<Uuid>) -> AppResult<Vec<Field>> {
        self.repository.fields.list(organization_id).await
    }

    pub async fn get_field(&self, id: Uuid) -> AppResult<Field> {
        self.repository.fields.get_by_id(id).await
    }

    pub async fn create_field(&self, data: &CreateField) -> AppResult<Field> {
        // The organization must exist before hanging a field off it
        self.repository
            .organizations
            .get_by_id(data.organization_id)
            .await?;
        self.repository.fields.create(data).await
    }

    pub async fn update_field(&self, id: Uuid, data: &UpdateField) -> AppResult<Field> {
        self.repository.fields.update(id, data).await
    }

    pub async fn deactivate_field(&self, id: Uuid) -> AppResult<()> {
        self.repository.fields.deactivate(id).await
    }
}
