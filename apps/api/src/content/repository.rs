use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

use crate::domain::Domain;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Blob store error: {0}")]
    Blob(String),

    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored document is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable storage for content documents, plus the raw published objects
/// (PDF snapshots and their pointer metadata). The core consumes this
/// interface; it never knows which backend it is talking to.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Loads the canonical document for a domain. If none is stored yet,
    /// the bundled default is persisted back and returned, so subsequent
    /// loads are stable.
    async fn load(&self, domain: Domain) -> Result<Value, StorageError>;

    /// Replaces the canonical document. The first save after a seeded
    /// load establishes the canonical stored value.
    async fn save(&self, domain: Domain, document: &Value) -> Result<(), StorageError>;

    /// Writes a timestamped backup copy. Backups are append-only; nothing
    /// in this service mutates or deletes them.
    async fn backup(
        &self,
        domain: Domain,
        document: &Value,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StorageError>;

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;

    async fn get_object(&self, key: &str) -> Result<Option<Bytes>, StorageError>;

    /// Public URL (or local path) where `key` can be fetched.
    fn object_url(&self, key: &str) -> String;
}

pub fn document_key(domain: Domain) -> String {
    format!("{}.json", domain.storage_key())
}

/// `backups/portfolio-data-2025-01-15T10-30-00-000Z.json`
pub fn backup_key(domain: Domain, timestamp: DateTime<Utc>) -> String {
    format!(
        "backups/{}-{}.json",
        domain.storage_key(),
        timestamp_slug(timestamp)
    )
}

/// RFC3339 with `:` and `.` replaced so the stamp is safe in object keys
/// and file names.
pub fn timestamp_slug(timestamp: DateTime<Utc>) -> String {
    timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}
