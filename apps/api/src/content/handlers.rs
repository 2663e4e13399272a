use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{error, warn};

use crate::cache::RenderCache;
use crate::content::resume::effective_skills;
use crate::content::ContentRepository;
use crate::domain::Domain;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProtectedReadQuery {
    #[serde(default)]
    pub password: String,
}

/// GET /api/v1/portfolio
/// Public read, served through the render cache.
pub async fn handle_get_portfolio(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(read_document(&state, Domain::Portfolio).await?))
}

/// GET /api/v1/resume?password=
/// Protected variant; the resume document is only served to an
/// authenticated caller.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Query(query): Query<ProtectedReadQuery>,
) -> Result<Json<Value>, AppError> {
    if !state.auth.validate(Domain::Resume, &query.password) {
        return Err(AppError::Unauthorized);
    }
    Ok(Json(read_document(&state, Domain::Resume).await?))
}

/// GET /api/v1/resume/skills?password=
/// The skills list flattened per the category rules in `content::resume`.
pub async fn handle_get_resume_skills(
    State(state): State<AppState>,
    Query(query): Query<ProtectedReadQuery>,
) -> Result<Json<Value>, AppError> {
    if !state.auth.validate(Domain::Resume, &query.password) {
        return Err(AppError::Unauthorized);
    }
    let document = read_document(&state, Domain::Resume).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "skills": effective_skills(&document),
    })))
}

/// Read-through render cache: a hit skips the repository entirely; a miss
/// loads, then fills the cache under the domain's API page path (which is
/// part of the domain's invalidation list).
async fn read_document(state: &AppState, domain: Domain) -> Result<Value, AppError> {
    let cache_path = domain.api_page();
    if let Some(body) = state.cache.get(cache_path).await {
        match serde_json::from_str(&body) {
            Ok(document) => return Ok(document),
            Err(e) => warn!("Discarding unparseable cached render for {cache_path}: {e}"),
        }
    }

    let document = state.repository.load(domain).await.map_err(|e| {
        error!("Failed to load {domain} document: {e}");
        AppError::Storage(format!("Failed to load {domain} content"))
    })?;

    if let Ok(body) = serde_json::to_string(&document) {
        state.cache.put(cache_path, &body).await;
    }
    Ok(document)
}
