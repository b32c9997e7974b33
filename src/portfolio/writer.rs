//! The project write orchestrator: coordinates relational row writes with
//! object storage uploads so the two stay in sync across partial failures.
//!
//! Create is fully compensated — a failure at any step leaves no project
//! row, no image rows, and no uploaded objects behind. Update is not: a
//! failure partway through leaves the deletions and insertions already
//! applied in place. That gap is deliberate and documented rather than
//! hidden behind a transaction the storage side could not join anyway.

use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::AppError;
use crate::models::{ProjectImage, ProjectWithImages};
use crate::storage::{self, ObjectStorage};

use super::form::{NewImage, ProjectDraft};

/// Create a project with its initial image set.
pub async fn create(
    pool: &PgPool,
    storage: &dyn ObjectStorage,
    draft: ProjectDraft,
    images: Vec<NewImage>,
) -> Result<ProjectWithImages, AppError> {
    validate_draft(&draft)?;
    if images.is_empty() {
        return Err(AppError::Validation(
            "At least one image is required".to_string(),
        ));
    }

    // Project row first; nothing to compensate if this fails.
    let project = db::projects::create(
        pool,
        &draft.title,
        draft.status,
        &draft.description,
        &draft.scope,
        &draft.cost,
        &draft.year,
    )
    .await?;

    let mut uploaded_keys: Vec<String> = Vec::new();
    let mut rows: Vec<ProjectImage> = Vec::new();

    // Sequential on purpose: the rollback set is exactly the keys uploaded
    // so far, in a deterministic order.
    for image in &images {
        let key = storage::object_key(project.id, &image.filename);

        let url = match storage
            .upload(&key, &image.content_type, image.bytes.clone())
            .await
        {
            Ok(url) => url,
            Err(e) => {
                roll_back_create(pool, storage, project.id, &uploaded_keys).await;
                return Err(AppError::Upload(e.message));
            }
        };
        uploaded_keys.push(key.clone());

        match db::project_images::create(pool, project.id, &url, &key, &image.filename, image.ratio)
            .await
        {
            Ok(row) => rows.push(row),
            Err(e) => {
                roll_back_create(pool, storage, project.id, &uploaded_keys).await;
                return Err(AppError::Store(e));
            }
        }
    }

    tracing::info!(project_id = %project.id, images = rows.len(), "Project created");
    Ok(ProjectWithImages {
        project,
        images: rows,
    })
}

/// Undo a partially applied create: remove every object uploaded during the
/// attempt, then delete the project row (image rows cascade with it).
async fn roll_back_create(
    pool: &PgPool,
    storage: &dyn ObjectStorage,
    project_id: Uuid,
    uploaded_keys: &[String],
) {
    if !uploaded_keys.is_empty() {
        let failures = storage.remove(uploaded_keys).await;
        storage::log_remove_failures("create rollback", &failures);
    }
    if let Err(e) = db::projects::delete(pool, project_id).await {
        tracing::error!(project_id = %project_id, "Rollback failed to delete project row: {e}");
    }
}

/// Update a project: replace its scalar fields, drop the images marked for
/// deletion, then upload and attach the new ones.
pub async fn update(
    pool: &PgPool,
    storage: &dyn ObjectStorage,
    id: Uuid,
    draft: ProjectDraft,
    delete_ids: Vec<Uuid>,
    new_images: Vec<NewImage>,
) -> Result<ProjectWithImages, AppError> {
    validate_draft(&draft)?;

    // Full-row replace, no partial patch. Last writer wins under concurrency.
    let project = db::projects::update(
        pool,
        id,
        &draft.title,
        draft.status,
        &draft.description,
        &draft.scope,
        &draft.cost,
        &draft.year,
    )
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => AppError::NotFound("Project not found".to_string()),
        _ => AppError::Store(e),
    })?;

    if !delete_ids.is_empty() {
        // Rows go first; the storage objects are best-effort cleanup whose
        // failure must never fail the request.
        let doomed = db::project_images::find_by_ids(pool, id, &delete_ids).await?;
        db::project_images::delete_by_ids(pool, id, &delete_ids).await?;

        let keys: Vec<String> = doomed.into_iter().map(|img| img.storage_key).collect();
        if !keys.is_empty() {
            let failures = storage.remove(&keys).await;
            storage::log_remove_failures("image deletion", &failures);
        }
    }

    // New images follow create's upload-then-insert ordering, but a failure
    // here aborts without unwinding the deletions and insertions above.
    for image in &new_images {
        let key = storage::object_key(id, &image.filename);

        let url = storage
            .upload(&key, &image.content_type, image.bytes.clone())
            .await
            .map_err(|e| AppError::Upload(e.message))?;

        if let Err(e) =
            db::project_images::create(pool, id, &url, &key, &image.filename, image.ratio).await
        {
            let failures = storage.remove(std::slice::from_ref(&key)).await;
            storage::log_remove_failures("update compensation", &failures);
            return Err(AppError::Store(e));
        }
    }

    let images = db::project_images::list_by_project(pool, id).await?;
    tracing::info!(project_id = %id, "Project updated");
    Ok(ProjectWithImages { project, images })
}

/// Delete a project, its image rows, and (best-effort) their storage objects.
pub async fn delete(pool: &PgPool, storage: &dyn ObjectStorage, id: Uuid) -> Result<(), AppError> {
    let project = db::projects::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let images = db::project_images::list_by_project(pool, id).await?;
    let keys: Vec<String> = images.into_iter().map(|img| img.storage_key).collect();

    // Storage first, but never blocking: a silent storage failure may orphan
    // objects, never metadata.
    if !keys.is_empty() {
        let failures = storage.remove(&keys).await;
        storage::log_remove_failures("project deletion", &failures);
    }

    db::project_images::delete_by_project(pool, id).await?;
    db::projects::delete(pool, id).await?;

    tracing::info!(project_id = %project.id, title = %project.title, "Project deleted");
    Ok(())
}

fn validate_draft(draft: &ProjectDraft) -> Result<(), AppError> {
    let mut missing = Vec::new();
    if draft.title.is_empty() {
        missing.push("title");
    }
    if draft.description.is_empty() {
        missing.push("description");
    }
    if draft.scope.is_empty() {
        missing.push("scope");
    }
    if draft.year.is_empty() {
        missing.push("year");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}
