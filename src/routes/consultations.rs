use axum::Json;
use axum::extract::State;
use serde::Deserialize;

use crate::auth::extractor::AuthUser;
use crate::db;
use crate::error::AppError;
use crate::models::Consultation;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct CreateConsultation {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub budget: String,
}

/// Public contact form handler.
pub async fn create(
    State(state): State<SharedState>,
    Json(req): Json<CreateConsultation>,
) -> Result<Json<serde_json::Value>, AppError> {
    if req.name.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation(
            "Name and email are required".to_string(),
        ));
    }

    let consultation = db::consultations::create(
        &state.pool,
        req.name.trim(),
        req.email.trim(),
        req.company.trim(),
        req.service.trim(),
        req.budget.trim(),
    )
    .await?;

    tracing::info!(consultation_id = %consultation.id, "Consultation request received");
    Ok(Json(serde_json::json!({ "message": "Thanks! We'll be in touch." })))
}

/// Admin-only listing of received inquiries, newest first.
pub async fn list(
    _auth: AuthUser,
    State(state): State<SharedState>,
) -> Result<Json<Vec<Consultation>>, AppError> {
    let consultations = db::consultations::list(&state.pool).await?;
    Ok(Json(consultations))
}
