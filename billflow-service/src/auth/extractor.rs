use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
    response::Redirect,
};
use time::OffsetDateTime;

use super::SESSION_COOKIE;
use crate::api::AppState;

/// Proof that the current request carries a valid session.
///
/// Handlers take this as an argument; requests without a valid session are
/// redirected to `/login` before the handler runs.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated {
    pub expires_at: OffsetDateTime,
}

pub fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

#[async_trait::async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        session_cookie(&parts.headers)
            .and_then(|token| state.sessions.verify(token, state.clock.now()))
            .map(|expires_at| Authenticated { expires_at })
            .ok_or_else(|| Redirect::to("/login"))
    }
}
