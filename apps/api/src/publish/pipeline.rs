//! The publish pipeline: authenticate → persist → backup → invalidate.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::auth::AuthGate;
use crate::cache::RenderCache;
use crate::content::repository::ContentRepository;
use crate::domain::Domain;
use crate::errors::AppError;

/// Outcome of a successful publish.
#[derive(Debug, Clone, Copy)]
pub struct PublishReceipt {
    pub published_at: DateTime<Utc>,
}

/// Turns a committed document into a durable, visible change. The save is
/// the only step allowed to fail the publish once the credential is
/// accepted: after it succeeds, a failed backup or invalidation is logged
/// and the publish still reports success.
#[derive(Clone)]
pub struct PublishPipeline {
    auth: AuthGate,
    repository: Arc<dyn ContentRepository>,
    cache: Arc<dyn RenderCache>,
}

impl PublishPipeline {
    pub fn new(
        auth: AuthGate,
        repository: Arc<dyn ContentRepository>,
        cache: Arc<dyn RenderCache>,
    ) -> Self {
        PublishPipeline {
            auth,
            repository,
            cache,
        }
    }

    /// Publishing twice with the same document produces the same stored
    /// state, aside from a second backup record. Concurrent publishes are
    /// not locked against each other; the later save wins.
    pub async fn publish(
        &self,
        domain: Domain,
        document: &Value,
        credential: &str,
    ) -> Result<PublishReceipt, AppError> {
        if !self.auth.validate(domain, credential) {
            return Err(AppError::Unauthorized);
        }

        self.repository.save(domain, document).await.map_err(|e| {
            error!("Failed to save {domain} document: {e}");
            AppError::Storage(format!("Failed to update {domain}"))
        })?;

        let published_at = Utc::now();
        if let Err(e) = self.repository.backup(domain, document, published_at).await {
            warn!("Backup write failed for {domain}: {e}");
        }

        for page in domain.pages() {
            if let Err(e) = self.cache.invalidate(page).await {
                warn!("{e}");
            }
        }

        info!("Published {domain} document");
        Ok(PublishReceipt { published_at })
    }
}
