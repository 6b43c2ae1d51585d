//! Dashboard route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use garuda_core::AdminRole;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::services::DashboardStats;
use crate::state::AppState;

/// Admin user view for templates.
#[derive(Debug, Clone)]
pub struct AdminUserView {
    pub name: String,
    pub email: String,
    pub role: String,
    pub is_super_admin: bool,
}

impl From<&CurrentAdmin> for AdminUserView {
    fn from(admin: &CurrentAdmin) -> Self {
        Self {
            name: admin.full_name.clone(),
            email: admin.email.to_string(),
            role: admin.role.to_string(),
            is_super_admin: admin.role == AdminRole::SuperAdmin,
        }
    }
}

/// One stored content section, as listed on the dashboard.
#[derive(Debug, Clone)]
pub struct SectionView {
    pub name: String,
    pub updated_at: String,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub admin_user: AdminUserView,
    pub stats: DashboardStats,
    pub sections: Vec<SectionView>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/api/dashboard/stats", get(stats))
}

/// Dashboard page.
///
/// GET /
#[instrument(skip_all, fields(admin_id = %admin.id))]
async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<DashboardTemplate, AppError> {
    let stats = DashboardStats::gather(state.managers()).await?;
    let sections = state
        .content()
        .list_sections()
        .await?
        .into_iter()
        .map(|row| SectionView {
            name: row.section_name.to_string(),
            updated_at: row.updated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        })
        .collect();

    Ok(DashboardTemplate {
        admin_user: AdminUserView::from(&admin),
        stats,
        sections,
    })
}

/// Dashboard statistics as JSON.
///
/// GET /api/dashboard/stats
#[instrument(skip_all)]
async fn stats(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<DashboardStats>, AppError> {
    Ok(Json(DashboardStats::gather(state.managers()).await?))
}
