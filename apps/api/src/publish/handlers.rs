use axum::{extract::State, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::content::repository::timestamp_slug;
use crate::content::ContentRepository;
use crate::domain::Domain;
use crate::editor::EditSession;
use crate::errors::AppError;
use crate::state::AppState;

pub const RESUME_METADATA_KEY: &str = "public/resume-metadata.json";

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub password: String,
    pub data: Value,
}

/// POST /api/v1/portfolio/update
pub async fn handle_update_portfolio(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .pipeline
        .publish(Domain::Portfolio, &req.data, &req.password)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Portfolio updated successfully",
        "data": req.data,
    })))
}

/// POST /api/v1/resume/update
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Json(req): Json<UpdateRequest>,
) -> Result<Json<Value>, AppError> {
    state
        .pipeline
        .publish(Domain::Resume, &req.data, &req.password)
        .await?;
    Ok(Json(json!({
        "success": true,
        "message": "Resume updated successfully",
    })))
}

/// One editor mutation, mirroring the three operations the edit UI
/// performs locally.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum EditOperation {
    Set { path: String, value: Value },
    Append { path: String, template: Value },
    Remove { path: String, index: i64 },
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub password: String,
    pub operations: Vec<EditOperation>,
}

/// POST /api/v1/portfolio/edit
pub async fn handle_edit_portfolio(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<Value>, AppError> {
    edit_document(&state, Domain::Portfolio, req).await
}

/// POST /api/v1/resume/edit
pub async fn handle_edit_resume(
    State(state): State<AppState>,
    Json(req): Json<EditRequest>,
) -> Result<Json<Value>, AppError> {
    edit_document(&state, Domain::Resume, req).await
}

/// Server-side counterpart of the editor flow: load the stored document
/// into an edit session, apply the batch of path mutations, commit, and
/// publish. The batch is all-or-nothing: the first failing operation
/// drops the session with the stored document untouched.
async fn edit_document(
    state: &AppState,
    domain: Domain,
    req: EditRequest,
) -> Result<Json<Value>, AppError> {
    if !state.auth.validate(domain, &req.password) {
        return Err(AppError::Unauthorized);
    }

    let initial = state.repository.load(domain).await.map_err(|e| {
        error!("Failed to load {domain} document: {e}");
        AppError::Storage(format!("Failed to load {domain} content"))
    })?;

    let mut session = EditSession::open(initial);
    for operation in &req.operations {
        match operation {
            EditOperation::Set { path, value } => session.set_field(path, value.clone())?,
            EditOperation::Append { path, template } => session.append_item(path, template)?,
            EditOperation::Remove { path, index } => session.remove_item(path, *index)?,
        }
    }

    let document = session.commit();
    state
        .pipeline
        .publish(domain, &document, &req.password)
        .await?;
    Ok(Json(json!({ "success": true, "document": document })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishPdfRequest {
    pub password: String,
    pub pdf_base64: String,
    pub file_name: String,
}

/// POST /api/v1/resume/publish
/// Stores an already-rasterized PDF snapshot under `public/` plus an
/// append-only archive copy. The rasterization itself happens
/// client-side; this endpoint only ever sees a finished PDF.
pub async fn handle_publish_resume_pdf(
    State(state): State<AppState>,
    Json(req): Json<PublishPdfRequest>,
) -> Result<Json<Value>, AppError> {
    if !state.auth.validate(Domain::Resume, &req.password) {
        return Err(AppError::Unauthorized);
    }

    let file_name = sanitize_file_name(&req.file_name)?;
    let pdf = BASE64
        .decode(req.pdf_base64.as_bytes())
        .map_err(|e| AppError::Validation(format!("pdfBase64 is not valid base64: {e}")))?;
    let pdf = Bytes::from(pdf);

    let current_key = format!("public/{file_name}");
    state
        .repository
        .put_object(&current_key, pdf.clone(), "application/pdf")
        .await
        .map_err(|e| {
            error!("Failed to store published resume PDF: {e}");
            AppError::Storage("Failed to publish resume".to_string())
        })?;

    // The current copy is already durable; the archive follows the same
    // rule as document backups and never fails the publish.
    let stem = file_name.strip_suffix(".pdf").unwrap_or(file_name);
    let archive_key = format!(
        "public/archives/{stem}-{}.pdf",
        timestamp_slug(Utc::now())
    );
    if let Err(e) = state
        .repository
        .put_object(&archive_key, pdf, "application/pdf")
        .await
    {
        warn!("Archive copy failed for {archive_key}: {e}");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Resume published successfully",
        "pdfUrl": state.repository.object_url(&current_key),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUrlRequest {
    pub password: String,
    pub pdf_url: String,
    pub file_name: String,
}

/// Pointer to the currently published PDF, stored as a small JSON blob so
/// the public endpoint can answer without listing the store.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMetadata {
    pub url: String,
    pub file_name: String,
    pub updated_at: DateTime<Utc>,
}

/// POST /api/v1/resume/save-url
pub async fn handle_save_resume_url(
    State(state): State<AppState>,
    Json(req): Json<SaveUrlRequest>,
) -> Result<Json<Value>, AppError> {
    if !state.auth.validate(Domain::Resume, &req.password) {
        return Err(AppError::Unauthorized);
    }

    let metadata = ResumeMetadata {
        url: req.pdf_url,
        file_name: req.file_name,
        updated_at: Utc::now(),
    };
    let body = serde_json::to_vec(&metadata).map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    state
        .repository
        .put_object(RESUME_METADATA_KEY, Bytes::from(body), "application/json")
        .await
        .map_err(|e| {
            error!("Failed to store resume metadata: {e}");
            AppError::Storage("Failed to save PDF URL".to_string())
        })?;

    Ok(Json(json!({
        "success": true,
        "message": "PDF URL saved successfully",
    })))
}

/// GET /api/v1/resume/public
/// No credential required; returns pointer metadata only, never resume
/// content.
pub async fn handle_get_public_resume(
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    let bytes = state
        .repository
        .get_object(RESUME_METADATA_KEY)
        .await
        .map_err(|e| {
            error!("Failed to fetch resume metadata: {e}");
            AppError::Storage("Failed to fetch resume".to_string())
        })?;

    let Some(bytes) = bytes else {
        return Err(AppError::NotFound("No published resume found".to_string()));
    };
    let metadata: ResumeMetadata = serde_json::from_slice(&bytes)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Stored resume metadata is corrupt: {e}")))?;

    Ok(Json(json!({
        "success": true,
        "pdfUrl": metadata.url,
        "fileName": metadata.file_name,
        "updatedAt": metadata.updated_at,
    })))
}

fn sanitize_file_name(file_name: &str) -> Result<&str, AppError> {
    if file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
    {
        return Err(AppError::Validation(format!(
            "Invalid file name `{file_name}`"
        )));
    }
    Ok(file_name)
}
