pub mod admin;
pub mod auth;
pub mod home;

use axum::Router;
use axum::routing::get;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        // Public site
        .route("/", get(home::index))
        // Auth
        .route("/auth/login", get(auth::login_page))
        // Admin panel
        .route("/admin", get(admin::projects_page))
        .route("/admin/projects/new", get(admin::new_project_page))
        .route("/admin/projects/{id}/edit", get(admin::edit_project_page))
}
