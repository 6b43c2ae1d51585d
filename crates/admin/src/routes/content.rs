//! Website content API.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use serde_json::Value;
use tracing::instrument;

use garuda_core::content::SectionName;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::ContentSection;
use crate::services::ContentError;
use crate::state::AppState;

/// Build the content router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/content", get(list))
        .route("/api/content/{section}", get(show).put(update))
}

fn section_name(raw: &str) -> Result<SectionName, AppError> {
    SectionName::parse(raw).map_err(|e| ContentError::Validation(e).into())
}

/// All stored sections.
///
/// GET /api/content
async fn list(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<ContentSection>>, AppError> {
    Ok(Json(state.content().list_sections().await?))
}

/// One section.
///
/// GET /api/content/{section}
async fn show(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(section): Path<String>,
) -> Result<Json<ContentSection>, AppError> {
    let name = section_name(&section)?;
    state
        .content()
        .fetch_section(&name)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("content section {name}")))
}

/// Replace a section's payload.
///
/// PUT /api/content/{section}
#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(section): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<ContentSection>, AppError> {
    let name = section_name(&section)?;
    let row = state
        .content()
        .update_section(Some(&admin), &name, &payload)
        .await?;
    Ok(Json(row))
}
