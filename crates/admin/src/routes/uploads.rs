//! Image upload API.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
    routing::post,
};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::RequireAdminAuth;
use crate::services::UploadError;
use crate::services::uploads::{AssetBucket, StoredAsset, UploadRejection};
use crate::state::AppState;

/// Multipart field holding the file.
const FILE_FIELD: &str = "file";

/// Build the upload router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/uploads/{bucket}", post(upload))
}

fn multipart_error(e: &MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Upload one image.
///
/// POST /api/uploads/{bucket} (multipart, field `file`)
#[instrument(skip(state, admin, multipart), fields(admin_id = %admin.id))]
async fn upload(
    State(state): State<AppState>,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(bucket): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredAsset>), AppError> {
    let bucket: AssetBucket = bucket
        .parse()
        .map_err(|e: UploadRejection| UploadError::Rejected(e))?;

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(&e))? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map_err(|e| multipart_error(&e))?;

        let asset = state
            .uploads()
            .upload(
                Some(&admin),
                bucket,
                file_name.as_deref(),
                content_type.as_deref(),
                &bytes,
            )
            .await?;
        return Ok((StatusCode::CREATED, Json(asset)));
    }

    Err(AppError::BadRequest(format!(
        "multipart field \"{FILE_FIELD}\" is required"
    )))
}
