use crate::error::{AppError, Result};
use crate::models::notification::{NotificationEvent, NotificationKind};
use crate::models::user::{PublicUser, User};
use crate::repositories::user as user_repo;
use crate::state::AppState;

/// The maximum number of users a suggestions query returns.
const SUGGESTION_LIMIT: i64 = 5;

/// Attaches the follow lists to a stored user record, producing the
/// password-stripped projection.
pub async fn to_public(state: &AppState, user: User) -> Result<PublicUser> {
    let followers = user_repo::followers_of(&state.db, &user.id).await?;
    let following = user_repo::following_of(&state.db, &user.id).await?;
    Ok(PublicUser::from_user(user, followers, following))
}

/// Returns up to 5 users the requester does not already follow, excluding the
/// requester. Recomputed fully on every call; no caching.
pub async fn suggestions(state: &AppState, requester_id: &str) -> Result<Vec<PublicUser>> {
    let users = user_repo::suggestions(&state.db, requester_id, SUGGESTION_LIMIT).await?;

    let mut result = Vec::with_capacity(users.len());
    for user in users {
        result.push(to_public(state, user).await?);
    }
    Ok(result)
}

/// Follows a user and dispatches a `follow` notification to the target's
/// channel.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `requester_id` - The ID of the user who wants to follow.
/// * `target_id` - The ID of the user being followed.
///
/// # Returns
///
/// A `Result` containing the requester's updated following list, newest first.
pub async fn follow(state: &AppState, requester_id: &str, target_id: &str) -> Result<Vec<String>> {
    if requester_id == target_id {
        return Err(AppError::Validation(
            "You cannot follow yourself".to_string(),
        ));
    }

    let requester = user_repo::find_by_id(&state.db, requester_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    if user_repo::find_by_id(&state.db, target_id).await?.is_none() {
        return Err(AppError::NotFound("User"));
    }

    if user_repo::follow_exists(&state.db, requester_id, target_id).await? {
        return Err(AppError::AlreadyFollowing);
    }

    user_repo::insert_follow(&state.db, requester_id, target_id).await?;
    tracing::info!("✅ User {} now follows {}", requester_id, target_id);

    // Dropped silently if the target has no connected session.
    state
        .bus
        .publish(
            target_id,
            NotificationEvent {
                kind: NotificationKind::Follow,
                from: requester.name,
                from_id: requester.id,
            },
        )
        .await;

    user_repo::following_of(&state.db, requester_id).await
}

/// Returns the public profile of any user. Fails with `NotFound` if absent.
pub async fn profile(state: &AppState, user_id: &str) -> Result<PublicUser> {
    let user = user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    to_public(state, user).await
}

/// Fetches a user's five oldest public repositories from the GitHub API.
/// Any upstream failure maps to a not-found response.
pub async fn github_repos(username: &str) -> Result<sonic_rs::Value> {
    let uri = format!(
        "https://api.github.com/users/{}/repos?per_page=5&sort=created:asc",
        username
    );

    let response = reqwest::Client::new()
        .get(&uri)
        .header(reqwest::header::USER_AGENT, "devconnect")
        .send()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    if !response.status().is_success() {
        return Err(AppError::Upstream(format!(
            "GitHub responded with {}",
            response.status()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    sonic_rs::from_str(&body).map_err(|e| AppError::Upstream(e.to_string()))
}
