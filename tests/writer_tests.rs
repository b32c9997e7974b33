mod common;

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use atelier::error::AppError;
use atelier::models::ProjectStatus;
use atelier::portfolio::writer;
use atelier::portfolio::{NewImage, ProjectDraft};
use atelier::storage::{ObjectStorage, RemoveFailure, StorageError};

/// In-memory storage that fails the Nth upload, for exercising the
/// orchestrator's compensation paths directly.
struct FlakyStorage {
    objects: Mutex<HashSet<String>>,
    uploads: AtomicUsize,
    /// 1-based index of the upload that fails; 0 disables failure.
    fail_on: usize,
}

impl FlakyStorage {
    fn new(fail_on: usize) -> Self {
        Self {
            objects: Mutex::new(HashSet::new()),
            uploads: AtomicUsize::new(0),
            fail_on,
        }
    }

    fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStorage for FlakyStorage {
    async fn upload(
        &self,
        key: &str,
        _content_type: &str,
        _bytes: Bytes,
    ) -> Result<String, StorageError> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on {
            return Err(StorageError::new("injected upload failure"));
        }
        self.objects.lock().unwrap().insert(key.to_string());
        Ok(self.public_url(key))
    }

    async fn remove(&self, keys: &[String]) -> Vec<RemoveFailure> {
        let mut objects = self.objects.lock().unwrap();
        for key in keys {
            objects.remove(key);
        }
        Vec::new()
    }

    fn public_url(&self, key: &str) -> String {
        format!("/fake/{key}")
    }
}

/// Storage whose removals always fail, for verifying that best-effort
/// cleanup never fails a request.
struct BrokenRemoveStorage;

#[async_trait]
impl ObjectStorage for BrokenRemoveStorage {
    async fn upload(
        &self,
        key: &str,
        _content_type: &str,
        _bytes: Bytes,
    ) -> Result<String, StorageError> {
        Ok(self.public_url(key))
    }

    async fn remove(&self, keys: &[String]) -> Vec<RemoveFailure> {
        keys.iter()
            .map(|key| RemoveFailure {
                key: key.clone(),
                reason: "backend unreachable".to_string(),
            })
            .collect()
    }

    fn public_url(&self, key: &str) -> String {
        format!("/fake/{key}")
    }
}

fn draft(title: &str) -> ProjectDraft {
    ProjectDraft {
        title: title.to_string(),
        status: ProjectStatus::InProgress,
        description: "desc".to_string(),
        scope: vec!["design".to_string()],
        cost: "$1".to_string(),
        year: "2024".to_string(),
    }
}

fn image(filename: &str, ratio: f64) -> NewImage {
    NewImage {
        filename: filename.to_string(),
        content_type: "image/png".to_string(),
        ratio,
        bytes: Bytes::from_static(b"pixels"),
    }
}

async fn project_count(pool: &sqlx::PgPool) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

async fn image_count(pool: &sqlx::PgPool) -> i64 {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project_images")
        .fetch_one(pool)
        .await
        .unwrap();
    row.0
}

#[tokio::test]
async fn create_rolls_back_on_upload_failure() {
    let app = common::spawn_app().await;
    let storage = FlakyStorage::new(2); // second of three uploads fails

    let result = writer::create(
        &app.pool,
        &storage,
        draft("Doomed Create"),
        vec![image("a.png", 1.0), image("b.png", 1.0), image("c.png", 1.0)],
    )
    .await;

    assert!(matches!(result, Err(AppError::Upload(_))));
    assert_eq!(project_count(&app.pool).await, 0);
    assert_eq!(image_count(&app.pool).await, 0);
    // The first upload succeeded and must have been compensated away
    assert_eq!(storage.object_count(), 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn create_rolls_back_on_row_insert_failure() {
    let app = common::spawn_app().await;
    let storage = FlakyStorage::new(0);

    // A non-positive ratio violates the table's CHECK constraint, so the
    // second image's row insert fails after its upload succeeded.
    let result = writer::create(
        &app.pool,
        &storage,
        draft("Doomed Create"),
        vec![image("a.png", 1.0), image("b.png", -1.0)],
    )
    .await;

    assert!(matches!(result, Err(AppError::Store(_))));
    assert_eq!(project_count(&app.pool).await, 0);
    assert_eq!(image_count(&app.pool).await, 0);
    assert_eq!(storage.object_count(), 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn create_with_invalid_draft_touches_nothing() {
    let app = common::spawn_app().await;
    let storage = FlakyStorage::new(0);

    let mut bad = draft("");
    bad.description = String::new();
    let result = writer::create(&app.pool, &storage, bad, vec![image("a.png", 1.0)]).await;

    match result {
        Err(AppError::Validation(msg)) => {
            assert!(msg.contains("title"));
            assert!(msg.contains("description"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(project_count(&app.pool).await, 0);
    assert_eq!(storage.object_count(), 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn update_failure_leaves_earlier_steps_applied() {
    let app = common::spawn_app().await;
    let storage = FlakyStorage::new(0);

    let created = writer::create(
        &app.pool,
        &storage,
        draft("Before"),
        vec![image("a.png", 1.0), image("b.png", 1.0)],
    )
    .await
    .unwrap();
    let first_image_id = created.images[0].id;

    // Third upload overall (the update's new image) fails; the scalar
    // replace and the marked deletion are NOT unwound.
    let failing = FlakyStorage::new(1);
    let result = writer::update(
        &app.pool,
        &failing,
        created.project.id,
        draft("After"),
        vec![first_image_id],
        vec![image("c.png", 1.0)],
    )
    .await;

    assert!(matches!(result, Err(AppError::Upload(_))));

    let title: (String,) = sqlx::query_as("SELECT title FROM projects WHERE id = $1")
        .bind(created.project.id)
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(title.0, "After");
    assert_eq!(image_count(&app.pool).await, 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn update_compensates_failed_row_insert_only() {
    let app = common::spawn_app().await;
    let storage = FlakyStorage::new(0);

    let created = writer::create(&app.pool, &storage, draft("Base"), vec![image("a.png", 1.0)])
        .await
        .unwrap();

    // Upload succeeds, row insert fails on the CHECK constraint; the
    // just-uploaded object is removed but the existing image stands.
    let result = writer::update(
        &app.pool,
        &storage,
        created.project.id,
        draft("Base"),
        vec![],
        vec![image("bad.png", 0.0)],
    )
    .await;

    assert!(matches!(result, Err(AppError::Store(_))));
    assert_eq!(image_count(&app.pool).await, 1);
    assert_eq!(storage.object_count(), 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn storage_removal_failures_never_surface() {
    let app = common::spawn_app().await;
    let storage = BrokenRemoveStorage;

    let created = writer::create(
        &app.pool,
        &storage,
        draft("Sticky Objects"),
        vec![image("a.png", 1.0), image("b.png", 1.0)],
    )
    .await
    .unwrap();
    let first_image_id = created.images[0].id;

    // Marked image row goes even though the object removal fails
    let updated = writer::update(
        &app.pool,
        &storage,
        created.project.id,
        draft("Sticky Objects"),
        vec![first_image_id],
        vec![],
    )
    .await
    .unwrap();
    assert_eq!(updated.images.len(), 1);
    assert_eq!(image_count(&app.pool).await, 1);

    // Project delete likewise succeeds; objects may orphan, metadata never
    writer::delete(&app.pool, &storage, created.project.id)
        .await
        .unwrap();
    assert_eq!(project_count(&app.pool).await, 0);
    assert_eq!(image_count(&app.pool).await, 0);

    common::cleanup(app).await;
}

#[tokio::test]
async fn delete_removes_rows_and_objects() {
    let app = common::spawn_app().await;
    let storage = FlakyStorage::new(0);

    let created = writer::create(
        &app.pool,
        &storage,
        draft("Goner"),
        vec![image("a.png", 1.0), image("b.png", 1.0)],
    )
    .await
    .unwrap();
    assert_eq!(storage.object_count(), 2);

    writer::delete(&app.pool, &storage, created.project.id)
        .await
        .unwrap();

    assert_eq!(project_count(&app.pool).await, 0);
    assert_eq!(image_count(&app.pool).await, 0);
    assert_eq!(storage.object_count(), 0);

    common::cleanup(app).await;
}
