use std::net::IpAddr;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub registration: RegistrationMode,
    pub max_upload_bytes: usize,
    pub log_level: String,
    pub storage: StorageConfig,
}

/// Where image binaries live. Bucket is the hosted-storage HTTP API;
/// Local keeps files on disk and serves them under /uploads.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Bucket {
        url: String,
        service_key: String,
        bucket: String,
    },
    Local {
        dir: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationMode {
    Open,
    Closed,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let database_url = env_required("DATABASE_URL")?;
        let jwt_secret = env_required("JWT_SECRET")?;

        let host: IpAddr = env_or("ATELIER_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid ATELIER_HOST: {e}"))?;

        let port: u16 = env_or("ATELIER_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid ATELIER_PORT: {e}"))?;

        let registration = match env_or("ATELIER_REGISTRATION", "closed").as_str() {
            "open" => RegistrationMode::Open,
            _ => RegistrationMode::Closed,
        };

        let max_upload_bytes: usize = env_or("ATELIER_MAX_UPLOAD_BYTES", "26214400")
            .parse()
            .map_err(|e| format!("Invalid ATELIER_MAX_UPLOAD_BYTES: {e}"))?;

        let log_level = env_or("ATELIER_LOG_LEVEL", "info");

        let storage = match (
            std::env::var("ATELIER_STORAGE_URL").ok(),
            std::env::var("ATELIER_STORAGE_KEY").ok(),
        ) {
            (Some(url), Some(service_key)) => StorageConfig::Bucket {
                url: url.trim_end_matches('/').to_string(),
                service_key,
                bucket: env_or("ATELIER_STORAGE_BUCKET", "project-images"),
            },
            _ => StorageConfig::Local {
                dir: env_or("ATELIER_UPLOADS_DIR", "uploads"),
            },
        };

        Ok(Config {
            database_url,
            jwt_secret,
            host,
            port,
            registration,
            max_upload_bytes,
            log_level,
            storage,
        })
    }
}

fn env_required(key: &str) -> Result<String, String> {
    std::env::var(key).map_err(|_| format!("Missing required environment variable: {key}"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
