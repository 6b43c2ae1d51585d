//! CRUD API for the managed record kinds.
//!
//! ```text
//! GET    /api/{kind}            - List
//! POST   /api/{kind}            - Create
//! GET    /api/{kind}/{id}       - Show
//! PUT    /api/{kind}/{id}       - Replace
//! DELETE /api/{kind}/{id}?confirm=true
//! ```
//!
//! `{kind}` is one of `programs`, `stories`, `gallery`, `events`,
//! `donations`, `volunteers`.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::models::{Donation, Event, GalleryItem, Program, Story, Volunteer};
use crate::services::{Confirmation, Managed};
use crate::state::AppState;

/// Query parameters for deletion.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

/// Build the entity router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(collection::<Program>())
        .merge(collection::<Story>())
        .merge(collection::<GalleryItem>())
        .merge(collection::<Event>())
        .merge(collection::<Donation>())
        .merge(collection::<Volunteer>())
}

fn collection<E: Managed>() -> Router<AppState> {
    let base = format!("/api/{}", E::COLLECTION);
    Router::new()
        .route(&base, get(list::<E>).post(create::<E>))
        .route(
            &format!("{base}/{{id}}"),
            get(show::<E>).put(update::<E>).delete(destroy::<E>),
        )
}

/// Decode a request body into an entity's fields.
///
/// Decoding from `Value` keeps malformed bodies a 400 with the decoder's
/// message, the same status as a validation failure.
fn decode<E: Managed>(body: Value) -> Result<E::Fields, AppError> {
    serde_json::from_value(body)
        .map_err(|e| AppError::BadRequest(format!("invalid {}: {e}", E::NOUN)))
}

async fn list<E: Managed>(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Vec<E>>, AppError> {
    Ok(Json(E::manager(state.managers()).list().await?))
}

async fn show<E: Managed>(
    State(state): State<AppState>,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<E::Id>,
) -> Result<Json<E>, AppError> {
    Ok(Json(E::manager(state.managers()).get(id).await?))
}

#[instrument(skip_all, fields(kind = E::COLLECTION, admin_id = %admin.id))]
async fn create<E: Managed>(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<E>), AppError> {
    let fields = decode::<E>(body)?;
    let record = E::manager(state.managers())
        .create(Some(&admin), &fields)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip_all, fields(kind = E::COLLECTION, admin_id = %admin.id, %id))]
async fn update<E: Managed>(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<E::Id>,
    Json(body): Json<Value>,
) -> Result<Json<E>, AppError> {
    let fields = decode::<E>(body)?;
    let record = E::manager(state.managers())
        .update(Some(&admin), id, &fields)
        .await?;
    Ok(Json(record))
}

#[instrument(skip_all, fields(kind = E::COLLECTION, admin_id = %admin.id, %id))]
async fn destroy<E: Managed>(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<E::Id>,
    Query(query): Query<DeleteQuery>,
) -> Result<StatusCode, AppError> {
    E::manager(state.managers())
        .delete(Some(&admin), id, Confirmation::from(query.confirm))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
