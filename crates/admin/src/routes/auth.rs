//! Authentication route handlers for admin.
//!
//! Password login in two flavours: an HTML form that redirects, and a JSON
//! endpoint for API clients. Both go through the same `AuthService`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, clear_sentry_user};
use crate::middleware::{OptionalAdminAuth, RequireAdminAuth};
use crate::models::CurrentAdmin;
use crate::services::AuthError;
use crate::state::AppState;

/// Login credentials, from a form or JSON body.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub email: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/logout", post(logout))
        .route("/api/auth/login", post(api_login))
        .route("/api/auth/session", get(current_session))
}

/// Render the login page.
///
/// GET /auth/login
async fn login_page(
    OptionalAdminAuth(admin): OptionalAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Response {
    if admin.is_some() {
        return Redirect::to("/").into_response();
    }

    LoginTemplate {
        error: query.error.map(|code| login_error_message(&code).to_string()),
        email: String::new(),
    }
    .into_response()
}

/// Handle the login form.
///
/// POST /auth/login
#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let password = SecretString::from(form.password);
    match state.auth().login(&session, &form.email, &password).await {
        Ok(_) => Ok(Redirect::to("/").into_response()),
        Err(AuthError::InvalidCredentials) => Ok((
            StatusCode::UNAUTHORIZED,
            LoginTemplate {
                error: Some(login_error_message("credentials").to_string()),
                email: form.email,
            },
        )
            .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// JSON login.
///
/// POST /api/auth/login
#[instrument(skip_all)]
async fn api_login(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<LoginForm>,
) -> Result<Json<CurrentAdmin>, AppError> {
    let password = SecretString::from(form.password);
    let admin = state.auth().login(&session, &form.email, &password).await?;
    Ok(Json(admin))
}

/// The signed-in admin.
///
/// GET /api/auth/session
async fn current_session(RequireAdminAuth(admin): RequireAdminAuth) -> Json<CurrentAdmin> {
    Json(admin)
}

/// Logout and clear session.
///
/// POST /auth/logout
async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Err(e) = state.auth().logout(&session).await {
        tracing::error!(error = %e, "failed to clear admin session");
    }
    clear_sentry_user();

    Redirect::to("/auth/login").into_response()
}

fn login_error_message(code: &str) -> &'static str {
    match code {
        "credentials" => "Invalid email or password.",
        "expired" => "Your session has expired. Please sign in again.",
        _ => "Sign-in failed. Please try again.",
    }
}
