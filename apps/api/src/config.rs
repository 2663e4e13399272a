use anyhow::{bail, Context, Result};
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub portfolio_password: String,
    pub resume_password: String,
    pub storage: StorageConfig,
    /// When unset, an in-process render cache is used instead of Redis.
    pub redis_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

/// Where documents live: an S3-compatible blob store in production, the
/// local filesystem in development.
#[derive(Debug, Clone)]
pub enum StorageConfig {
    Blob {
        bucket: String,
        endpoint: String,
        access_key_id: String,
        secret_access_key: String,
    },
    File {
        data_dir: PathBuf,
    },
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let backend = std::env::var("CONTENT_STORAGE").unwrap_or_else(|_| "file".to_string());
        let storage = match backend.as_str() {
            "blob" => StorageConfig::Blob {
                bucket: require_env("S3_BUCKET")?,
                endpoint: require_env("S3_ENDPOINT")?,
                access_key_id: require_env("AWS_ACCESS_KEY_ID")?,
                secret_access_key: require_env("AWS_SECRET_ACCESS_KEY")?,
            },
            "file" => StorageConfig::File {
                data_dir: std::env::var("DATA_DIR")
                    .unwrap_or_else(|_| "data".to_string())
                    .into(),
            },
            other => bail!("CONTENT_STORAGE must be `blob` or `file`, got `{other}`"),
        };

        Ok(Config {
            portfolio_password: require_env("PORTFOLIO_PASSWORD")?,
            resume_password: require_env("RESUME_PASSWORD")?,
            storage,
            redis_url: std::env::var("REDIS_URL").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
