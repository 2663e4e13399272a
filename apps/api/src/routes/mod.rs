pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::content::handlers as content;
use crate::publish::handlers as publish;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Portfolio domain
        .route("/api/v1/portfolio", get(content::handle_get_portfolio))
        .route(
            "/api/v1/portfolio/update",
            post(publish::handle_update_portfolio),
        )
        .route(
            "/api/v1/portfolio/edit",
            post(publish::handle_edit_portfolio),
        )
        // Resume domain
        .route("/api/v1/resume", get(content::handle_get_resume))
        .route(
            "/api/v1/resume/skills",
            get(content::handle_get_resume_skills),
        )
        .route("/api/v1/resume/update", post(publish::handle_update_resume))
        .route("/api/v1/resume/edit", post(publish::handle_edit_resume))
        .route(
            "/api/v1/resume/publish",
            post(publish::handle_publish_resume_pdf),
        )
        .route(
            "/api/v1/resume/save-url",
            post(publish::handle_save_resume_url),
        )
        .route(
            "/api/v1/resume/public",
            get(publish::handle_get_public_resume),
        )
        .with_state(state)
}
