use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use http::header;
use tower_cookies::Cookies;

use crate::{
    crypto::token,
    error::AppError,
    models::session::Session,
    state::AppState,
};

/// Extracts the session token from the `token` cookie, falling back to an
/// `Authorization: Bearer` header.
fn extract_token(cookies: &Cookies, request: &Request<Body>) -> Option<String> {
    if let Some(cookie) = cookies.get("token") {
        return Some(cookie.value().to_string());
    }

    request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}

/// A middleware that requires a valid session token to be present.
///
/// Verifies signature and expiry against the process-wide decoding key and
/// injects a `Session` extension carrying the user ID. Every authenticated
/// route sits behind this gate.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `cookies` - The request cookies.
/// * `request` - The incoming request.
/// * `next` - The next middleware in the chain.
///
/// # Returns
///
/// A `Response` or an `AppError`.
pub async fn require_auth(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    tracing::debug!("🔐 Checking authentication...");

    let presented = extract_token(&cookies, &request).ok_or_else(|| {
        tracing::warn!("❌ No token cookie or bearer header found");
        AppError::Unauthenticated
    })?;

    let user_id = token::verify(&state.decoding_key, &presented)?;
    tracing::debug!("✅ User authenticated: {}", user_id);

    request.extensions_mut().insert(Session { user_id });

    Ok(next.run(request).await)
}
