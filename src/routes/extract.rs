//! Request extractors shared by the handlers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::{
    error::{AppError, AppResult},
    models::BookingDraft,
};

pub const TOKEN_COOKIE: &str = "token";
const TOKEN_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Booking draft parsed from the query string
#[derive(Debug, Clone)]
pub struct Draft(pub BookingDraft);

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Draft {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        BookingDraft::from_query(query).map(Draft)
    }
}

/// Caller's session, read from the `token` cookie. Absent when the caller
/// never logged in.
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Token of a logged-in caller, [`AppError::Unauthorized`] otherwise
    pub fn require(&self) -> AppResult<&str> {
        self.token().ok_or(AppError::Unauthorized)
    }
}

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Session {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == TOKEN_COOKIE)
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Ok(Session { token })
    }
}

/// `Set-Cookie` value storing `token` for a day
pub fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; HttpOnly; Path=/; Max-Age={}; SameSite=Lax",
        TOKEN_COOKIE, token, TOKEN_MAX_AGE_SECS
    )
}

/// `Set-Cookie` value expiring the session
pub fn cleared_session_cookie() -> String {
    format!("{}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax", TOKEN_COOKIE)
}
