use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, Result},
    models::session::Session,
    services::users as users_service,
    state::AppState,
};

/// Returns up to 5 follow suggestions for the authenticated user.
#[axum::debug_handler]
pub async fn suggestions(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> Result<Response> {
    let users = users_service::suggestions(&state, &session.user_id).await?;
    Ok(Json(users).into_response())
}

/// Follows a user and returns the updated following list.
#[axum::debug_handler]
pub async fn follow(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response> {
    let following = users_service::follow(&state, &session.user_id, &id).await?;
    Ok(Json(following).into_response())
}

/// Returns a user's public profile.
#[axum::debug_handler]
pub async fn profile(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response> {
    let user = users_service::profile(&state, &id).await?;
    Ok(Json(user).into_response())
}

/// Passes through a user's repository list from the GitHub API.
#[axum::debug_handler]
pub async fn github_repos(Path(username): Path<String>) -> Result<Response> {
    let repos = users_service::github_repos(&username).await?;

    let body = sonic_rs::to_string(&repos)
        .map_err(|e| AppError::Internal(format!("Repo serialization failed: {}", e)))?;
    Ok((StatusCode::OK, body).into_response())
}
