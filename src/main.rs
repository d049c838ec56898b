// ABOUTME: Main entry point for the LegalFlow practice-management backend
// ABOUTME: Loads configuration, opens the database, wires routes and serves the JSON API

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    response::Json,
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

mod auth;
mod auth_helpers;
mod config;
mod entities;
mod error;
mod extract;
mod handlers;
mod middleware;
mod migration;
mod session;
mod stats;
mod storage;
mod types;
mod uploads;

#[cfg(test)]
mod storage_tests;

use config::Config;
use session::SessionStore;
use storage::Storage;
use uploads::{CloudinaryStore, DisabledStore, ObjectStore};

/// Room for multipart framing on top of the file itself; the file cap is
/// enforced separately once the field is read.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Runtime settings handlers read on the request path.
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub secure_cookies: bool,
    pub max_upload_bytes: usize,
    pub upload_folder: String,
}

impl From<&Config> for AppSettings {
    fn from(config: &Config) -> Self {
        Self {
            secure_cookies: config.secure_cookies,
            max_upload_bytes: config.max_upload_bytes,
            upload_folder: config.upload_folder.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub sessions: SessionStore,
    pub objects: Arc<dyn ObjectStore>,
    pub settings: Arc<AppSettings>,
}

pub fn app(state: AppState) -> Router {
    let upload_limit = state.settings.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/user", get(auth::get_profile).put(auth::update_profile))
        .route("/user/password", put(auth::change_password))
        .route(
            "/clients",
            get(handlers::clients::list_clients)
                .post(handlers::clients::create_client)
                .put(handlers::clients::update_client)
                .delete(handlers::clients::delete_client),
        )
        .route(
            "/cases",
            get(handlers::cases::list_cases).post(handlers::cases::create_case),
        )
        .route(
            "/cases/:id",
            get(handlers::cases::get_case).put(handlers::cases::update_case),
        )
        .route("/cases/:id/notes", post(handlers::cases::add_note))
        .route(
            "/cases/:id/documents",
            post(handlers::documents::create_document).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/documents/:id", delete(handlers::documents::delete_document))
        .route("/stats", get(handlers::dashboard::stats))
        .route("/hearings", get(handlers::dashboard::hearings))
        .layer(axum_middleware::from_fn(middleware::security_headers))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn init_tracing(json_logs: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("legalflow=info,tower_http=info"));

    if json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::parse();
    init_tracing(config.log_json);

    let storage = Arc::new(Storage::connect(&config.database_url).await?);

    let objects: Arc<dyn ObjectStore> = match config.cloudinary() {
        Some(credentials) => {
            tracing::info!(cloud = %credentials.cloud_name, "Document uploads go to Cloudinary");
            Arc::new(CloudinaryStore::new(credentials))
        }
        None => {
            tracing::warn!("Cloudinary is not configured; document uploads will fail");
            Arc::new(DisabledStore)
        }
    };

    let state = AppState {
        storage,
        sessions: SessionStore::new(config.session_max_age_secs),
        objects,
        settings: Arc::new(AppSettings::from(&config)),
    };

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "LegalFlow listening");

    axum::serve(listener, app(state)).await?;
    Ok(())
}
