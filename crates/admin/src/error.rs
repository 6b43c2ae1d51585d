//! Unified error handling for admin.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use garuda_core::AdminUserId;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::content::ContentError;
use crate::services::entities::EntityError;
use crate::services::uploads::{UploadError, UploadRejection};

/// Application-level error type for the admin panel.
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Content operation failed.
    #[error(transparent)]
    Content(#[from] ContentError),

    /// Entity operation failed.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Upload failed.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request body over the configured limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::WeakPassword(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Content(ContentError::AuthRequired)
            | Self::Entity(EntityError::AuthRequired)
            | Self::Upload(UploadError::AuthRequired) => StatusCode::UNAUTHORIZED,
            Self::Content(ContentError::Validation(_))
            | Self::Entity(EntityError::Validation(_) | EntityError::ConfirmationRequired(_))
            | Self::Upload(UploadError::Rejected(UploadRejection::Empty)) => {
                StatusCode::BAD_REQUEST
            }
            Self::Upload(UploadError::Rejected(UploadRejection::NotAnImage(_))) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Upload(UploadError::Rejected(UploadRejection::TooLarge { .. }))
            | Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Entity(EntityError::NotFound(_))
            | Self::Upload(UploadError::Rejected(UploadRejection::UnknownBucket(_)))
            | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Entity(EntityError::Store(RepositoryError::Conflict(_))) => StatusCode::CONFLICT,
            Self::Upload(UploadError::Storage(_)) => StatusCode::BAD_GATEWAY,
            Self::Auth(_)
            | Self::Content(ContentError::Store(_))
            | Self::Entity(EntityError::Store(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Internal server error".to_string(),
            StatusCode::BAD_GATEWAY => "Storage service error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Set the Sentry user context from an admin user ID.
pub fn set_sentry_user(admin_user_id: AdminUserId, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(admin_user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use garuda_core::ValidationError;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("program".to_string());
        assert_eq!(err.to_string(), "Not found: program");

        let err = AppError::Entity(EntityError::Validation(ValidationError::NotPositive {
            field: "amount",
        }));
        assert_eq!(err.to_string(), "amount must be greater than zero");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::Content(ContentError::AuthRequired)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Entity(EntityError::ConfirmationRequired("donation"))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Upload(UploadError::Rejected(UploadRejection::TooLarge {
                size: 6,
                max: 5,
            }))),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            get_status(AppError::Upload(UploadError::Rejected(UploadRejection::NotAnImage(
                "text/plain".to_string()
            )))),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            get_status(AppError::Entity(EntityError::NotFound("event"))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Entity(EntityError::Store(RepositoryError::Conflict(
                "volunteer email already exists".to_string()
            )))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Entity(EntityError::Store(RepositoryError::DataCorruption(
                "bad status".to_string()
            )))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
