use axum::{
    Extension, Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    error::{AppError, Result},
    models::session::Session,
    services::posts as posts_service,
    state::AppState,
};

/// The request payload for creating a post or a comment.
#[derive(Deserialize, Debug)]
pub struct TextRequest {
    pub text: String,
}

/// Creates a post authored by the authenticated user.
#[axum::debug_handler]
pub async fn create_post(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Json(payload): Json<TextRequest>,
) -> Result<Response> {
    if payload.text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }

    let post = posts_service::create_post(&state, &session.user_id, payload.text).await?;
    Ok(Json(post).into_response())
}

/// Returns the full feed, newest first.
#[axum::debug_handler]
pub async fn list_posts(
    State(state): State<AppState>,
    Extension(_session): Extension<Session>,
) -> Result<Response> {
    let posts = posts_service::list_posts(&state).await?;
    Ok(Json(posts).into_response())
}

/// Toggles the authenticated user's like on a post and returns the updated
/// like list.
#[axum::debug_handler]
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
) -> Result<Response> {
    let likes = posts_service::toggle_like(&state, &id, &session.user_id).await?;
    Ok(Json(likes).into_response())
}

/// Comments on a post and returns the updated comment list, newest first.
#[axum::debug_handler]
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    Path(id): Path<String>,
    Json(payload): Json<TextRequest>,
) -> Result<Response> {
    if payload.text.trim().is_empty() {
        return Err(AppError::Validation("Text is required".to_string()));
    }

    let comments =
        posts_service::add_comment(&state, &id, &session.user_id, payload.text).await?;
    Ok(Json(comments).into_response())
}
