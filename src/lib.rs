pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod portfolio;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod storage;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use sqlx::PgPool;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, StorageConfig};
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::storage::ObjectStorage;
use crate::storage::bucket::BucketStorage;
use crate::storage::local::LocalStorage;

pub fn build_app(pool: PgPool, config: Config) -> Router {
    let max_upload_bytes = config.max_upload_bytes;

    let (storage, uploads_dir): (Arc<dyn ObjectStorage>, Option<String>) = match &config.storage {
        StorageConfig::Bucket { url, service_key, bucket } => {
            tracing::info!("Using bucket storage at {url} (bucket: {bucket})");
            (Arc::new(BucketStorage::new(url, service_key, bucket)), None)
        }
        StorageConfig::Local { dir } => {
            tracing::info!("Using local storage at {dir}");
            (Arc::new(LocalStorage::new(dir)), Some(dir.clone()))
        }
    };

    let state: SharedState = Arc::new(AppState {
        pool,
        config,
        storage,
        login_limiter: LoginRateLimiter::new(),
    });

    let mut app = Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes().layer(axum::middleware::from_fn(redirect_unauthorized)))
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health));

    // Local storage objects are served by the app itself
    if let Some(dir) = uploads_dir {
        app = app.nest_service("/uploads", ServeDir::new(dir));
    }

    app.layer(SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-content-type-options"),
        HeaderValue::from_static("nosniff"),
    ))
    .layer(SetResponseHeaderLayer::overriding(
        HeaderName::from_static("x-frame-options"),
        HeaderValue::from_static("DENY"),
    ))
    .layer(SetResponseHeaderLayer::overriding(
        HeaderName::from_static("referrer-policy"),
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    ))
    .layer(TraceLayer::new_for_http())
    // axum's own limit is disabled so the configured one is the only cap
    .layer(axum::extract::DefaultBodyLimit::disable())
    .layer(RequestBodyLimitLayer::new(max_upload_bytes))
    .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
