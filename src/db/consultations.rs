use sqlx::PgPool;

use crate::models::Consultation;

pub async fn create(
    pool: &PgPool,
    name: &str,
    email: &str,
    company: &str,
    service: &str,
    budget: &str,
) -> Result<Consultation, sqlx::Error> {
    sqlx::query_as::<_, Consultation>(
        "INSERT INTO consultations (name, email, company, service, budget)
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(name)
    .bind(email)
    .bind(company)
    .bind(service)
    .bind(budget)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Consultation>, sqlx::Error> {
    sqlx::query_as::<_, Consultation>("SELECT * FROM consultations ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}
