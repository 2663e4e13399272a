use std::sync::Arc;

use crate::auth::AuthGate;
use crate::cache::RenderCache;
use crate::content::ContentRepository;
use crate::publish::PublishPipeline;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn ContentRepository>,
    pub cache: Arc<dyn RenderCache>,
    pub auth: AuthGate,
    pub pipeline: PublishPipeline,
}
