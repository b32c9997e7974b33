use axum::http::HeaderMap;
use bytes::Bytes;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::ProjectStatus;

/// Scalar project fields as submitted by the admin form.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub title: String,
    pub status: ProjectStatus,
    pub description: String,
    pub scope: Vec<String>,
    pub cost: String,
    pub year: String,
}

/// A freshly submitted image file with its precomputed aspect ratio.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub filename: String,
    pub content_type: String,
    pub ratio: f64,
    pub bytes: Bytes,
}

/// Everything a project write request carries: scalar fields, new image
/// files, and (for updates) the image ids marked for deletion.
#[derive(Debug)]
pub struct ProjectForm {
    pub draft: ProjectDraft,
    pub new_images: Vec<NewImage>,
    pub delete_images: Vec<Uuid>,
}

struct FilePart {
    filename: String,
    content_type: String,
    bytes: Bytes,
}

/// Parse a multipart project write request. Text fields: `title`, `status`,
/// `description`, `scope` (comma-separated tags), `cost`, `year`,
/// `delete_images` (JSON array of image ids). File fields: repeated `files`,
/// with a parallel repeated `ratios` text field carrying each file's aspect
/// ratio in submission order.
pub async fn parse_multipart(headers: &HeaderMap, body: Bytes) -> Result<ProjectForm, AppError> {
    let boundary = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or_else(|| AppError::Validation("Missing multipart boundary".to_string()))?;

    let stream = futures_util::stream::once(async { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut title = String::new();
    let mut status = None;
    let mut description = String::new();
    let mut scope_raw = String::new();
    let mut cost = String::new();
    let mut year = String::new();
    let mut delete_raw = String::new();
    let mut files: Vec<FilePart> = Vec::new();
    let mut ratios: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "files" => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("File read error: {e}")))?;
                files.push(FilePart {
                    filename,
                    content_type,
                    bytes,
                });
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Field read error: {e}")))?;
                match name.as_str() {
                    "title" => title = value,
                    "status" => {
                        status = Some(ProjectStatus::parse(&value).ok_or_else(|| {
                            AppError::Validation(format!("Unknown status: {value}"))
                        })?)
                    }
                    "description" => description = value,
                    "scope" => scope_raw = value,
                    "cost" => cost = value,
                    "year" => year = value,
                    "ratios" => ratios.push(value),
                    "delete_images" => delete_raw = value,
                    _ => {}
                }
            }
        }
    }

    let scope: Vec<String> = scope_raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let delete_images: Vec<Uuid> = if delete_raw.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&delete_raw)
            .map_err(|e| AppError::Validation(format!("Invalid delete_images list: {e}")))?
    };

    let new_images = files
        .into_iter()
        .enumerate()
        .map(|(i, file)| NewImage {
            filename: file.filename,
            content_type: file.content_type,
            ratio: parse_ratio(ratios.get(i)),
            bytes: file.bytes,
        })
        .collect();

    Ok(ProjectForm {
        draft: ProjectDraft {
            title: title.trim().to_string(),
            status: status.unwrap_or(ProjectStatus::InProgress),
            description: description.trim().to_string(),
            scope,
            cost: cost.trim().to_string(),
            year: year.trim().to_string(),
        },
        new_images,
        delete_images,
    })
}

/// Aspect ratios must be positive; anything missing or malformed falls back
/// to 1.0 rather than failing the request.
fn parse_ratio(raw: Option<&String>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|r| r.is_finite() && *r > 0.0)
        .unwrap_or(1.0)
}
