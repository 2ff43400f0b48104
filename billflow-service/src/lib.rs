pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod import;
pub mod metrics_server;
pub mod observability;
pub mod store;
pub mod validation;

pub use api::{router, AppState};
