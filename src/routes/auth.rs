use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{Credentials, Registration, UserProfile},
    routes::{
        extract::{cleared_session_cookie, session_cookie, Session},
        AppState,
    },
};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub authenticated: bool,
    pub profile: Option<UserProfile>,
}

/// Logs in against the backend and keeps its token in an HttpOnly cookie.
/// The token itself is never returned in the body.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Response> {
    let login = state.backend.login(&credentials).await?;
    let token = login
        .token
        .ok_or_else(|| AppError::ExternalApi("Backend login returned no token".to_string()))?;

    let mut body = login.user;
    body.insert("authenticated".to_string(), Value::Bool(true));

    Ok((
        [(header::SET_COOKIE, session_cookie(&token))],
        Json(Value::Object(body)),
    )
        .into_response())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(registration): Json<Registration>,
) -> AppResult<Json<Value>> {
    let created = state.backend.register(&registration).await?;
    Ok(Json(created))
}

pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, cleared_session_cookie())],
        Json(json!({ "authenticated": false })),
    )
        .into_response()
}

/// Who the session cookie belongs to. A missing or rejected token is an
/// anonymous caller, not an error.
pub async fn me(State(state): State<Arc<AppState>>, session: Session) -> AppResult<Json<WhoAmI>> {
    let Some(token) = session.token() else {
        return Ok(Json(WhoAmI {
            authenticated: false,
            profile: None,
        }));
    };

    match state.backend.user_profile(token).await {
        Ok(profile) => Ok(Json(WhoAmI {
            authenticated: true,
            profile: Some(profile),
        })),
        Err(AppError::Unauthorized) => Ok(Json(WhoAmI {
            authenticated: false,
            profile: None,
        })),
        Err(e) => Err(e),
    }
}
