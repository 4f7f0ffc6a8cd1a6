use axum::{
    Extension, Json,
    extract::State,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};

use crate::{
    config::Config,
    error::Result,
    models::session::Session,
    models::user::PublicUser,
    services::auth as auth_service,
    state::AppState,
    validation::auth::*,
};

/// The request payload for user registration.
#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub github: Option<String>,
}

/// The request payload for user login.
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The response payload for register and login.
#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicUser,
}

/// A short message envelope.
#[derive(Serialize)]
pub struct MsgResponse {
    pub msg: String,
}

/// Creates the HTTP-only session cookie holding the signed token.
fn create_session_cookie(config: &Config, token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new("token", token);

    cookie.set_http_only(true);
    if config.app_env == "production" {
        cookie.set_secure(true);
    }
    cookie.set_same_site(tower_cookies::cookie::SameSite::Lax);
    cookie.set_max_age(Duration::seconds(config.session_duration_days * 86400));
    cookie.set_path("/");

    cookie
}

/// Handles user registration.
#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response> {
    tracing::info!("📝 Register attempt for email: {}", payload.email);
    validate_name(&payload.name)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;

    let (token, user) = auth_service::register(
        &state,
        payload.name,
        payload.email,
        payload.password,
        payload.github,
    )
    .await?;

    cookies.add(create_session_cookie(&state.config, token.clone()));
    tracing::info!("✅ Session cookie added for user: {}", user.id);

    Ok(Json(AuthResponse { token, user }).into_response())
}

/// Handles user login.
#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<Response> {
    tracing::info!("🔐 Login attempt for email: {}", payload.email);
    validate_email(&payload.email)?;

    let (token, user) = auth_service::login(&state, payload.email, payload.password).await?;

    cookies.add(create_session_cookie(&state.config, token.clone()));
    tracing::info!("✅ Session cookie added for user: {}", user.id);

    Ok(Json(AuthResponse { token, user }).into_response())
}

/// Returns the authenticated user's own profile, password stripped.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    let user = auth_service::current_user(&state, &session.user_id).await?;
    Ok(Json(user).into_response())
}

/// Handles user logout by clearing the session cookie. Idempotent; there is
/// no server-side revocation list.
#[axum::debug_handler]
pub async fn logout(
    Extension(session): Extension<Session>,
    cookies: Cookies,
) -> Result<Response> {
    tracing::info!("👋 Logout for user: {}", session.user_id);

    let mut cookie = Cookie::new("token", "");
    cookie.set_max_age(Duration::seconds(0));
    cookie.set_path("/");
    cookies.remove(cookie);

    Ok(Json(MsgResponse {
        msg: "Logged out".to_string(),
    })
    .into_response())
}
