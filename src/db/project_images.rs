use sqlx::PgPool;
use uuid::Uuid;

use crate::models::ProjectImage;

pub async fn create(
    pool: &PgPool,
    project_id: Uuid,
    url: &str,
    storage_key: &str,
    alt_text: &str,
    ratio: f64,
) -> Result<ProjectImage, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>(
        "INSERT INTO project_images (project_id, url, storage_key, alt_text, ratio)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(project_id)
    .bind(url)
    .bind(storage_key)
    .bind(alt_text)
    .bind(ratio)
    .fetch_one(pool)
    .await
}

pub async fn list_by_project(
    pool: &PgPool,
    project_id: Uuid,
) -> Result<Vec<ProjectImage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>(
        "SELECT * FROM project_images WHERE project_id = $1 ORDER BY created_at ASC, id ASC",
    )
    .bind(project_id)
    .fetch_all(pool)
    .await
}

/// Fetch a set of images by id, scoped to one project so an update request
/// can never touch another project's images.
pub async fn find_by_ids(
    pool: &PgPool,
    project_id: Uuid,
    ids: &[Uuid],
) -> Result<Vec<ProjectImage>, sqlx::Error> {
    sqlx::query_as::<_, ProjectImage>(
        "SELECT * FROM project_images WHERE project_id = $1 AND id = ANY($2)",
    )
    .bind(project_id)
    .bind(ids)
    .fetch_all(pool)
    .await
}

pub async fn delete_by_ids(
    pool: &PgPool,
    project_id: Uuid,
    ids: &[Uuid],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM project_images WHERE project_id = $1 AND id = ANY($2)")
        .bind(project_id)
        .bind(ids)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete_by_project(pool: &PgPool, project_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM project_images WHERE project_id = $1")
        .bind(project_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
