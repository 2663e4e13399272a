mod auth;
mod cache;
mod config;
mod content;
mod domain;
mod editor;
mod errors;
mod publish;
mod routes;
mod state;

use anyhow::Result;
use aws_config::timeout::TimeoutConfig;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::AuthGate;
use crate::cache::{MemoryRenderCache, RedisRenderCache, RenderCache};
use crate::config::{Config, StorageConfig};
use crate::content::{BlobRepository, ContentRepository, FileRepository};
use crate::publish::PublishPipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting portfolio content API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the content repository (blob store or local filesystem)
    let repository: Arc<dyn ContentRepository> = match &config.storage {
        StorageConfig::Blob {
            bucket,
            endpoint,
            access_key_id,
            secret_access_key,
        } => {
            let s3 = build_s3_client(endpoint, access_key_id, secret_access_key).await;
            info!("S3 client initialized (bucket: {bucket})");
            Arc::new(BlobRepository::new(s3, bucket.clone(), endpoint.clone()))
        }
        StorageConfig::File { data_dir } => {
            info!("Filesystem repository at {}", data_dir.display());
            Arc::new(FileRepository::new(data_dir.clone()))
        }
    };

    // Initialize the render cache (Redis, or in-process when unconfigured)
    let render_cache: Arc<dyn RenderCache> = match &config.redis_url {
        Some(url) => {
            let client = redis::Client::open(url.as_str())?;
            info!("Redis render cache initialized");
            Arc::new(RedisRenderCache::new(client))
        }
        None => {
            info!("REDIS_URL not set, using in-process render cache");
            Arc::new(MemoryRenderCache::new())
        }
    };

    let auth = AuthGate::new(
        config.portfolio_password.clone(),
        config.resume_password.clone(),
    );
    let pipeline = PublishPipeline::new(
        auth.clone(),
        Arc::clone(&repository),
        Arc::clone(&render_cache),
    );

    // Build app state
    let state = AppState {
        repository,
        cache: render_cache,
        auth,
        pipeline,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
/// Requests carry a bounded timeout so storage trouble fails closed
/// instead of hanging a publish.
async fn build_s3_client(
    endpoint: &str,
    access_key_id: &str,
    secret_access_key: &str,
) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        access_key_id,
        secret_access_key,
        None,
        None,
        "portfolio-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(endpoint)
        .timeout_config(
            TimeoutConfig::builder()
                .operation_timeout(Duration::from_secs(10))
                .build(),
        )
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
