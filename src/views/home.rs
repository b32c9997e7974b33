use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse};

use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    projects: Vec<WorkItem>,
}

struct WorkItem {
    title: String,
    year: String,
    status: String,
    scope: Vec<String>,
    description: String,
    images: Vec<WorkImage>,
}

struct WorkImage {
    url: String,
    alt: String,
    ratio: f64,
}

/// Public landing page: hero, about, services, the work grid built from the
/// portfolio, and the contact form.
pub async fn index(State(state): State<SharedState>) -> Result<impl IntoResponse, AppError> {
    let projects = db::projects::list_with_images(&state.pool).await?;

    let items = projects
        .into_iter()
        .map(|p| WorkItem {
            title: p.project.title,
            year: p.project.year,
            status: p.project.status.to_string(),
            scope: p.project.scope,
            description: p.project.description,
            images: p
                .images
                .into_iter()
                .map(|img| WorkImage {
                    url: img.url,
                    alt: img.alt_text,
                    ratio: img.ratio,
                })
                .collect(),
        })
        .collect();

    let template = HomeTemplate { projects: items };
    Ok(Html(template.render().unwrap_or_default()))
}
