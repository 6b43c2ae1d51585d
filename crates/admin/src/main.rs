//! Garuda Dhruvam Foundation admin dashboard.
//!
//! This binary serves the content dashboard on port 3001.
//!
//! # Architecture
//!
//! - Axum web framework
//! - Askama templates for the login and dashboard pages, JSON API for the rest
//! - `PostgreSQL` for content, records, admin users and sessions
//! - Local disk or remote object storage for uploaded images
//!
//! Migrations are not run on startup; use `gd-cli migrate`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Router, routing::get};
use chrono::Duration;
use sentry::integrations::tracing as sentry_tracing;
use sqlx::PgPool;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use garuda_admin::config::{AdminConfig, StorageConfig};
use garuda_admin::db::{
    self, PgAdminUserStore, PgDonationStore, PgEventStore, PgGalleryStore, PgProgramStore,
    PgSectionStore, PgStoryStore, PgVolunteerStore,
};
use garuda_admin::middleware::create_session_layer;
use garuda_admin::routes;
use garuda_admin::services::uploads::{LocalObjectStore, ObjectStore, RemoteObjectStore};
use garuda_admin::services::{
    AuthService, ContentRepository, EntityManager, Managers, PasswordIdentityProvider,
    UploadService,
};
use garuda_admin::state::AppState;

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            traces_sample_rate: config.sentry_traces_sample_rate,
            attach_stacktrace: true,
            send_default_pii: false,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Build the object store selected by configuration.
fn object_store(config: &AdminConfig) -> Arc<dyn ObjectStore> {
    match &config.storage {
        StorageConfig::Local { dir, public_url } => {
            Arc::new(LocalObjectStore::new(dir.clone(), public_url))
        }
        StorageConfig::Remote {
            endpoint,
            service_key,
        } => Arc::new(
            RemoteObjectStore::new(endpoint, service_key)
                .expect("Failed to create object storage client"),
        ),
    }
}

/// Wire `PostgreSQL` stores into the services.
fn build_state(config: &AdminConfig, pool: &PgPool) -> AppState {
    let identity = Arc::new(PasswordIdentityProvider::new(Arc::new(
        PgAdminUserStore::new(pool.clone()),
    )));
    let auth = AuthService::new(identity, Duration::hours(config.session_max_age_hours));

    let content = ContentRepository::new(Arc::new(PgSectionStore::new(pool.clone())));

    let managers = Managers {
        programs: EntityManager::new(Arc::new(PgProgramStore::new(pool.clone()))),
        stories: EntityManager::new(Arc::new(PgStoryStore::new(pool.clone()))),
        gallery: EntityManager::new(Arc::new(PgGalleryStore::new(pool.clone()))),
        events: EntityManager::new(Arc::new(PgEventStore::new(pool.clone()))),
        donations: EntityManager::new(Arc::new(PgDonationStore::new(pool.clone()))),
        volunteers: EntityManager::new(Arc::new(PgVolunteerStore::new(pool.clone()))),
    };

    let uploads = UploadService::new(object_store(config), config.upload_max_bytes);

    AppState::new(auth, content, managers, uploads)
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = AdminConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "garuda_admin=info,tower_http=debug".into());

    // JSON logs for log shippers, text locally
    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    // Initialize database connection pool
    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // Sessions live in tower_sessions.session (created by `gd-cli migrate`)
    let session_layer = create_session_layer(
        PostgresStore::new(pool.clone()),
        config.is_https(),
        config.session_max_age_hours,
    );

    let state = build_state(&config, &pool);
    tracing::info!(storage = ?config.storage, "Application state built");

    let mut app = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness).with_state(pool.clone()))
        .merge(routes::app(state, session_layer));

    if let StorageConfig::Local { dir, .. } = &config.storage {
        app = app.nest_service("/uploads", routes::uploaded_files(dir));
    }

    let app = app
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("admin listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(pool): State<PgPool>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(&pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
