use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use billflow_core::DomainError;
use serde_json::json;

use crate::{store::StoreError, validation::InputError};

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Input(_) | Self::Domain(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error, message) = match &self {
            Self::Input(_) | Self::Domain(_) => ("invalid input", self.to_string()),
            Self::Unauthorized(_) => ("unauthorized", self.to_string()),
            Self::Store(e) => {
                tracing::error!(error = %e, "data store failure");
                ("storage error", "failed to access stored data".to_string())
            }
        };

        (status, Json(json!({ "error": error, "message": message }))).into_response()
    }
}
