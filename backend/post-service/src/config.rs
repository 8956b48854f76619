/// Configuration management for post-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub media_host: MediaHostConfig,
    pub upload: UploadConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// External binary-object host that stores uploaded media and
/// auto-detects whether the content is an image or a video.
#[derive(Clone, Debug, Deserialize)]
pub struct MediaHostConfig {
    pub upload_url: String,
    pub api_key: Option<String>,
    /// Logical folder/namespace the binaries are filed under upstream.
    pub folder: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct UploadConfig {
    /// Upper bound on an accepted multipart body, enforced while streaming.
    pub max_body_bytes: usize,
}

/// 100MB default request body cap
const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024 * 1024;

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Config {
            app: AppConfig {
                host: std::env::var("POST_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("POST_SERVICE_PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
                env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/prism".to_string()),
                max_connections: std::env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            },
            media_host: MediaHostConfig {
                upload_url: std::env::var("MEDIA_HOST_UPLOAD_URL")
                    .unwrap_or_else(|_| "http://localhost:9000/upload".to_string()),
                api_key: std::env::var("MEDIA_HOST_API_KEY").ok(),
                folder: std::env::var("MEDIA_HOST_FOLDER").unwrap_or_else(|_| "prism".to_string()),
                timeout_secs: std::env::var("MEDIA_HOST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60),
            },
            upload: UploadConfig {
                max_body_bytes: std::env::var("UPLOAD_MAX_BODY_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            },
        })
    }
}
