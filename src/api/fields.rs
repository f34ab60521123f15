//! Field catalog endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::field::{CreateField, Field, UpdateField},
};

/// Query parameters for listing fields
#[derive(Debug, Deserialize, IntoParams)]
pub struct FieldsQuery {
    /// Restrict to one organization
    pub organization_id: Option<Uuid>,
}

/// List fields
#[utoipa::path(
    get,
    path = "/fields",
    tag = "fields",
    params(FieldsQuery),
    responses(
        (status = 200, description = "List of fields", body = Vec<Field>)
    )
)]
pub async fn list_fields(
    State(state): State<crate::AppState>,
    Query(query): Query<FieldsQuery>,
) -> AppResult<Json<Vec<Field>>> {
    let fields = state.services.fields.list_fields(query.organization_id).await?;
    Ok(Json(fields))
}

/// Get field details by ID
#[utoipa::path(
    get,
    path = "/fields/{id}",
    tag = "fields",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    responses(
        (status = 200, description = "Field details", body = Field),
        (status = 404, description = "Field not found")
    )
)]
pub async fn get_field(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Field>> {
    let field = state.services.fields.get_field(id).await?;
    Ok(Json(field))
}

/// Create a new field
#[utoipa::path(
    post,
    path = "/fields",
    tag = "fields",
    request_body = CreateField,
    responses(
        (status = 201, description = "Field created", body = Field),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Organization not found")
    )
)]
pub async fn create_field(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateField>,
) -> AppResult<(StatusCode, Json<Field>)> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.services.fields.create_field(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a field
#[utoipa::path(
    put,
    path = "/fields/{id}",
    tag = "fields",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    request_body = UpdateField,
    responses(
        (status = 200, description = "Field updated", body = Field),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Field not found")
    )
)]
pub async fn update_field(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateField>,
) -> AppResult<Json<Field>> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state.services.fields.update_field(id, &request).await?;
    Ok(Json(updated))
}

/// Deactivate a field; existing bookings are kept
#[utoipa::path(
    delete,
    path = "/fields/{id}",
    tag = "fields",
    params(
        ("id" = Uuid, Path, description = "Field ID")
    ),
    responses(
        (status = 204, description = "Field deactivated"),
        (status = 404, description = "Field not found")
    )
)]
pub async fn deactivate_field(
    State(state): State<crate::AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.fields.deactivate_field(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
