use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Project, ProjectImage, ProjectStatus, ProjectWithImages};

pub async fn create(
    pool: &PgPool,
    title: &str,
    status: ProjectStatus,
    description: &str,
    scope: &[String],
    cost: &str,
    year: &str,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "INSERT INTO projects (title, status, description, scope, cost, year)
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
    )
    .bind(title)
    .bind(status)
    .bind(description)
    .bind(scope)
    .bind(cost)
    .bind(year)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Project>, sqlx::Error> {
    sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Full-row replace of the scalar fields. Images are managed separately.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    title: &str,
    status: ProjectStatus,
    description: &str,
    scope: &[String],
    cost: &str,
    year: &str,
) -> Result<Project, sqlx::Error> {
    sqlx::query_as::<_, Project>(
        "UPDATE projects SET title = $2, status = $3, description = $4, scope = $5,
         cost = $6, year = $7 WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(title)
    .bind(status)
    .bind(description)
    .bind(scope)
    .bind(cost)
    .bind(year)
    .fetch_one(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Joined read for a single project, images in insertion order.
pub async fn find_with_images(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<ProjectWithImages>, sqlx::Error> {
    let Some(project) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let images = super::project_images::list_by_project(pool, id).await?;
    Ok(Some(ProjectWithImages { project, images }))
}

/// Joined listing, newest project first; images per project in insertion order.
pub async fn list_with_images(pool: &PgPool) -> Result<Vec<ProjectWithImages>, sqlx::Error> {
    let projects =
        sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await?;

    let images = sqlx::query_as::<_, ProjectImage>(
        "SELECT * FROM project_images ORDER BY created_at ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;

    let mut by_project: HashMap<Uuid, Vec<ProjectImage>> = HashMap::new();
    for image in images {
        by_project.entry(image.project_id).or_default().push(image);
    }

    Ok(projects
        .into_iter()
        .map(|project| {
            let images = by_project.remove(&project.id).unwrap_or_default();
            ProjectWithImages { project, images }
        })
        .collect())
}
