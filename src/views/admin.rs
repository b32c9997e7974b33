use askama::Template;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "admin/projects.html")]
struct ProjectsTemplate {
    user_name: String,
    projects: Vec<ProjectRow>,
}

struct ProjectRow {
    id: String,
    title: String,
    year: String,
    status: String,
    image_count: usize,
    thumb_url: String,
}

#[derive(Template)]
#[template(path = "admin/project_form.html")]
struct ProjectFormTemplate {
    is_edit: bool,
    id: String,
    title: String,
    status: String,
    description: String,
    scope: String,
    cost: String,
    year: String,
    images: Vec<ExistingImage>,
}

struct ExistingImage {
    id: String,
    url: String,
    alt: String,
}

pub async fn projects_page(
    auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, AppError> {
    let user_name = db::users::find_by_id(&state.pool, auth.user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_default();

    let projects = db::projects::list_with_images(&state.pool)
        .await?
        .into_iter()
        .map(|p| ProjectRow {
            id: p.project.id.to_string(),
            title: p.project.title,
            year: p.project.year,
            status: p.project.status.to_string(),
            image_count: p.images.len(),
            thumb_url: p
                .images
                .first()
                .map(|img| img.url.clone())
                .unwrap_or_default(),
        })
        .collect();

    let template = ProjectsTemplate {
        user_name,
        projects,
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn new_project_page(_auth: AuthUser) -> Result<impl IntoResponse, AppError> {
    let template = ProjectFormTemplate {
        is_edit: false,
        id: String::new(),
        title: String::new(),
        status: "in-progress".to_string(),
        description: String::new(),
        scope: String::new(),
        cost: String::new(),
        year: String::new(),
        images: Vec::new(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}

pub async fn edit_project_page(
    _auth: AuthUser,
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = db::projects::find_with_images(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let template = ProjectFormTemplate {
        is_edit: true,
        id: project.project.id.to_string(),
        title: project.project.title,
        status: project.project.status.to_string(),
        description: project.project.description,
        scope: project.project.scope.join(", "),
        cost: project.project.cost,
        year: project.project.year,
        images: project
            .images
            .into_iter()
            .map(|img| ExistingImage {
                id: img.id.to_string(),
                url: img.url,
                alt: img.alt_text,
            })
            .collect(),
    };
    Ok(Html(template.render().unwrap_or_default()))
}
