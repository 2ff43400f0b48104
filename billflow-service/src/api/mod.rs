pub mod error;
pub mod handlers;
pub mod models;

use std::{sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Router,
};

use crate::{auth::SessionKeys, clock::Clock, config::AppConfig, store::JsonFileStore};

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonFileStore>,
    pub sessions: Arc<SessionKeys>,
    pub password: Arc<str>,
    pub clock: Clock,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            store: Arc::new(JsonFileStore::new(cfg.store.data_path.clone())),
            sessions: Arc::new(SessionKeys::new(
                &cfg.auth.session_secret,
                Duration::from_secs(cfg.auth.session_ttl_secs),
            )),
            password: Arc::from(cfg.auth.password.as_str()),
            clock: Clock::System {
                offset: cfg.utc_offset()?,
            },
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/login", get(handlers::login_page).post(handlers::login))
        .route("/logout", get(handlers::logout))
        .route("/", get(handlers::dashboard))
        .route("/new", post(handlers::new_reading))
        .route("/settings", get(handlers::settings).post(handlers::update_settings))
        .with_state(state)
}
