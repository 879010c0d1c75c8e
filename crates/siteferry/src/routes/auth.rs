use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::AppError;
use crate::session::{SESSION_COOKIE, Session};
use crate::state::AppState;

fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)
            .and_then(|rest| rest.strip_prefix('='))
    })
}

/// Gate `/api` behind a live session. The session rides along in the
/// request extensions for the CSRF check and the handlers.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = session_cookie(request.headers())
        .and_then(|value| state.sessions.get(value))
        .ok_or_else(|| AppError::Unauthorized("session expired".into()))?;
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}

/// Mutating `/api` requests must present the session's CSRF token.
pub async fn check_csrf(request: Request, next: Next) -> Result<Response, AppError> {
    let method = request.method();
    if method != Method::GET && method != Method::HEAD && method != Method::OPTIONS {
        let session = request
            .extensions()
            .get::<Session>()
            .ok_or_else(|| AppError::Unauthorized("session expired".into()))?;
        let presented = request
            .headers()
            .get("x-csrf-token")
            .and_then(|value| value.to_str().ok());
        if presented != Some(session.csrf_token.as_str()) {
            return Err(AppError::Csrf);
        }
    }
    Ok(next.run(request).await)
}

pub async fn csrf_token(
    axum::Extension(session): axum::Extension<Session>,
) -> Json<Value> {
    Json(json!({ "csrfToken": session.csrf_token }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Response, AppError> {
    if !state.login_limiter.check(&addr.ip().to_string()) {
        return Err(AppError::RateLimited);
    }

    if credentials.username != state.config.auth_user
        || credentials.password != state.config.auth_pass
    {
        return Err(AppError::Unauthorized("invalid credentials".into()));
    }

    let cookie = state.sessions.create(&credentials.username);
    let header_value = HeaderValue::try_from(format!(
        "{SESSION_COOKIE}={cookie}; HttpOnly; SameSite=Lax; Path=/; Max-Age=86400"
    ))
    .map_err(|_| AppError::Internal)?;

    let mut response = Json(json!({ "success": true })).into_response();
    response.headers_mut().insert(header::SET_COOKIE, header_value);
    Ok(response)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(value) = session_cookie(&headers) {
        state.sessions.destroy(value);
    }

    let mut response = Json(json!({ "success": true })).into_response();
    if let Ok(expired) =
        HeaderValue::try_from(format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0"))
    {
        response.headers_mut().insert(header::SET_COOKIE, expired);
    }
    response
}
