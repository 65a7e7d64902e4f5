//! Token authentication gate.
//!
//! Every request under `/api` must carry `Authorization: Token <key>`. The
//! key is looked up in the store on each request; nothing is cached between
//! requests.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{
    error::{AppError, AppResult},
    models::ApiUser,
    AppState,
};

pub const KEYWORD: &str = "Token";

const NOT_PROVIDED: &str = "Authentication credentials were not provided.";
const NO_CREDENTIALS: &str = "Invalid token header. No credentials provided.";
const HAS_SPACES: &str = "Invalid token header. Token string should not contain spaces.";
const BAD_CHARACTERS: &str =
    "Invalid token header. Token string should not contain invalid characters.";
const INVALID_TOKEN: &str = "Invalid token.";
const INACTIVE_USER: &str = "User inactive or deleted.";

fn unauthenticated(detail: &str) -> AppError {
    AppError::Unauthenticated(detail.to_string())
}

/// Extract the key from the `Authorization` header.
///
/// A missing header or a different scheme counts as "not provided"; a
/// `Token` header with the wrong shape is rejected outright.
pub fn token_from_headers(headers: &HeaderMap) -> AppResult<&str> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Err(unauthenticated(NOT_PROVIDED));
    };

    let mut parts = value.as_bytes().split(u8::is_ascii_whitespace).filter(|p| !p.is_empty());
    match parts.next() {
        Some(scheme) if scheme.eq_ignore_ascii_case(KEYWORD.as_bytes()) => {}
        _ => return Err(unauthenticated(NOT_PROVIDED)),
    }

    let key = parts.next().ok_or_else(|| unauthenticated(NO_CREDENTIALS))?;
    if parts.next().is_some() {
        return Err(unauthenticated(HAS_SPACES));
    }
    std::str::from_utf8(key).map_err(|_| unauthenticated(BAD_CHARACTERS))
}

/// Resolve the headers to an active user.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> AppResult<ApiUser> {
    let key = token_from_headers(headers)?;
    let token = state
        .store
        .find_token(key)
        .await?
        .ok_or_else(|| unauthenticated(INVALID_TOKEN))?;

    if !token.is_active {
        return Err(unauthenticated(INACTIVE_USER));
    }
    Ok(token.user())
}

/// Middleware: reject with 401 or continue as the authenticated user.
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let user = match authenticate(&state, request.headers()).await {
        Ok(user) => user,
        Err(err) => {
            debug!(
                method = %request.method(),
                path = request.uri().path(),
                error = %err,
                "Rejected request"
            );
            return Err(err);
        }
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
