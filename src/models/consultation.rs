use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct Consultation {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub company: String,
    pub service: String,
    pub budget: String,
    pub created_at: DateTime<Utc>,
}
