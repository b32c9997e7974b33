use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::ProjectWithImages;
use crate::portfolio::{form, writer};
use crate::state::SharedState;

/// Public joined listing, newest first. Feeds both the work grid and the
/// admin panel.
pub async fn list(
    State(state): State<SharedState>,
) -> Result<Json<Vec<ProjectWithImages>>, AppError> {
    let projects = db::projects::list_with_images(&state.pool).await?;
    Ok(Json(projects))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProjectWithImages>, AppError> {
    let project = db::projects::find_with_images(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    Ok(Json(project))
}

pub async fn create(
    _auth: AuthUser,
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProjectWithImages>, AppError> {
    let form = form::parse_multipart(&headers, body).await?;
    let created = writer::create(
        &state.pool,
        state.storage.as_ref(),
        form.draft,
        form.new_images,
    )
    .await?;
    Ok(Json(created))
}

pub async fn update(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ProjectWithImages>, AppError> {
    let form = form::parse_multipart(&headers, body).await?;
    let updated = writer::update(
        &state.pool,
        state.storage.as_ref(),
        id,
        form.draft,
        form.delete_images,
        form.new_images,
    )
    .await?;
    Ok(Json(updated))
}

pub async fn delete(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    writer::delete(&state.pool, state.storage.as_ref(), id).await?;
    Ok(Json(serde_json::json!({ "message": "Project deleted" })))
}
