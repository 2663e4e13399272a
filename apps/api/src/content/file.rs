use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::fs;
use tracing::info;

use crate::content::defaults;
use crate::content::repository::{backup_key, document_key, ContentRepository, StorageError};
use crate::domain::Domain;

/// Local-filesystem fallback used in development. Mirrors the blob key
/// layout under a data directory.
pub struct FileRepository {
    data_dir: PathBuf,
}

impl FileRepository {
    pub fn new(data_dir: PathBuf) -> Self {
        FileRepository { data_dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.data_dir.join(key)
    }

    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn write_json(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        self.write_bytes(key, &serde_json::to_vec_pretty(document)?)
            .await
    }
}

#[async_trait]
impl ContentRepository for FileRepository {
    async fn load(&self, domain: Domain) -> Result<Value, StorageError> {
        let key = document_key(domain);
        match fs::read(self.path_for(&key)).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let default = defaults::default_document(domain);
                info!("No stored {domain} document, seeding bundled default");
                self.write_json(&key, &default).await?;
                Ok(default)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, domain: Domain, document: &Value) -> Result<(), StorageError> {
        self.write_json(&document_key(domain), document).await
    }

    async fn backup(
        &self,
        domain: Domain,
        document: &Value,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.write_json(&backup_key(domain, timestamp), document)
            .await
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let _ = content_type; // the filesystem has no content-type metadata
        self.write_bytes(key, &body).await
    }

    async fn get_object(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(Bytes::from(bytes))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn object_url(&self, key: &str) -> String {
        self.path_for(key).display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn repo() -> (tempfile::TempDir, FileRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileRepository::new(dir.path().to_path_buf());
        (dir, repo)
    }

    #[tokio::test]
    async fn test_first_load_seeds_and_persists_default() {
        let (_dir, repo) = repo();
        let first = repo.load(Domain::Portfolio).await.unwrap();
        let second = repo.load(Domain::Portfolio).await.unwrap();
        assert_eq!(first, second);
        assert!(first.get("personalInfo").is_some());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trips() {
        let (_dir, repo) = repo();
        let doc = json!({"projects": [{"name": "X"}]});
        repo.save(Domain::Portfolio, &doc).await.unwrap();
        assert_eq!(repo.load(Domain::Portfolio).await.unwrap(), doc);
    }

    #[tokio::test]
    async fn test_save_establishes_canonical_value_over_seeded_default() {
        let (_dir, repo) = repo();
        let seeded = repo.load(Domain::Resume).await.unwrap();
        let doc = json!({"name": "Ada", "experience": []});
        repo.save(Domain::Resume, &doc).await.unwrap();
        let loaded = repo.load(Domain::Resume).await.unwrap();
        assert_eq!(loaded, doc);
        assert_ne!(loaded, seeded);
    }

    #[tokio::test]
    async fn test_backup_lands_under_backups_prefix() {
        let (dir, repo) = repo();
        let doc = json!({"tags": ["a"]});
        let ts = Utc::now();
        repo.backup(Domain::Portfolio, &doc, ts).await.unwrap();
        let path = dir.path().join(backup_key(Domain::Portfolio, ts));
        let stored: Value = serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(stored, doc);
    }

    #[tokio::test]
    async fn test_domains_use_isolated_keys() {
        let (_dir, repo) = repo();
        repo.save(Domain::Portfolio, &json!({"kind": "portfolio"}))
            .await
            .unwrap();
        repo.save(Domain::Resume, &json!({"kind": "resume"}))
            .await
            .unwrap();
        assert_eq!(
            repo.load(Domain::Portfolio).await.unwrap()["kind"],
            json!("portfolio")
        );
        assert_eq!(
            repo.load(Domain::Resume).await.unwrap()["kind"],
            json!("resume")
        );
    }

    #[tokio::test]
    async fn test_get_object_missing_is_none() {
        let (_dir, repo) = repo();
        assert!(repo
            .get_object("public/resume-metadata.json")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_object() {
        let (_dir, repo) = repo();
        let body = Bytes::from_static(b"%PDF-1.4 fake");
        repo.put_object("public/resume.pdf", body.clone(), "application/pdf")
            .await
            .unwrap();
        assert_eq!(
            repo.get_object("public/resume.pdf").await.unwrap(),
            Some(body)
        );
    }
}
