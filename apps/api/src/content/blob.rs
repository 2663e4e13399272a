use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::info;

use crate::content::defaults;
use crate::content::repository::{backup_key, document_key, ContentRepository, StorageError};
use crate::domain::Domain;

/// S3-compatible blob store (MinIO locally, AWS or any S3 clone in
/// production). Documents are stored pretty-printed so the blobs stay
/// hand-inspectable.
pub struct BlobRepository {
    client: S3Client,
    bucket: String,
    endpoint: String,
}

impl BlobRepository {
    pub fn new(client: S3Client, bucket: String, endpoint: String) -> Self {
        BlobRepository {
            client,
            bucket,
            endpoint,
        }
    }

    async fn put_json(&self, key: &str, document: &Value) -> Result<(), StorageError> {
        let body = serde_json::to_vec_pretty(document)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StorageError::Blob(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for BlobRepository {
    async fn load(&self, domain: Domain) -> Result<Value, StorageError> {
        let key = document_key(domain);
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(&key)
            .send()
            .await
        {
            Ok(output) => {
                let bytes = output
                    .body
                    .collect()
                    .await
                    .map_err(|e| StorageError::Blob(e.to_string()))?
                    .into_bytes();
                Ok(serde_json::from_slice(&bytes)?)
            }
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    let default = defaults::default_document(domain);
                    info!("No stored {domain} document, seeding bundled default");
                    self.put_json(&key, &default).await?;
                    Ok(default)
                } else {
                    Err(StorageError::Blob(service_err.to_string()))
                }
            }
        }
    }

    async fn save(&self, domain: Domain, document: &Value) -> Result<(), StorageError> {
        self.put_json(&document_key(domain), document).await
    }

    async fn backup(
        &self,
        domain: Domain,
        document: &Value,
        timestamp: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.put_json(&backup_key(domain, timestamp), document).await
    }

    async fn put_object(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Blob(e.to_string()))?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Bytes>, StorageError> {
        match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => Ok(Some(
                output
                    .body
                    .collect()
                    .await
                    .map_err(|e| StorageError::Blob(e.to_string()))?
                    .into_bytes(),
            )),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_no_such_key() {
                    Ok(None)
                } else {
                    Err(StorageError::Blob(service_err.to_string()))
                }
            }
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            self.bucket,
            key
        )
    }
}
