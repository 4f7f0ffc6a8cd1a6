use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::post::{Comment, Like, Post, PostRow};
use crate::repositories::{post as post_repo, user as user_repo};
use crate::state::AppState;

/// Creates a post, snapshotting the author's name and avatar at call time.
/// The snapshot never updates if the author later edits their profile.
pub async fn create_post(state: &AppState, author_id: &str, text: String) -> Result<Post> {
    let author = user_repo::find_by_id(&state.db, author_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;

    let row = PostRow {
        id: Uuid::new_v4().to_string(),
        user_id: author.id,
        name: author.name,
        avatar: author.avatar,
        text,
        created_at: Utc::now(),
    };
    post_repo::insert_post(&state.db, &row).await?;
    tracing::info!("✅ Post created: {}", row.id);

    Ok(Post::from_row(row, Vec::new(), Vec::new()))
}

/// Returns the full feed, newest post first, with like and comment lists
/// attached. Three queries total, grouped in memory.
pub async fn list_posts(state: &AppState) -> Result<Vec<Post>> {
    let rows = post_repo::list_all(&state.db).await?;

    let mut likes_by_post: HashMap<String, Vec<Like>> = HashMap::new();
    for like in post_repo::all_likes(&state.db).await? {
        likes_by_post
            .entry(like.post_id.clone())
            .or_default()
            .push(like);
    }

    let mut comments_by_post: HashMap<String, Vec<Comment>> = HashMap::new();
    for comment in post_repo::all_comments(&state.db).await? {
        comments_by_post
            .entry(comment.post_id.clone())
            .or_default()
            .push(comment);
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let likes = likes_by_post.remove(&row.id).unwrap_or_default();
            let comments = comments_by_post.remove(&row.id).unwrap_or_default();
            Post::from_row(row, likes, comments)
        })
        .collect())
}

/// Toggles the requesting user's like on a post and returns the updated like
/// list. Fails with `NotFound` if the post is absent.
///
/// TODO: dispatch a `like` event to the post owner's channel; today only
/// follows reach the notification bus.
pub async fn toggle_like(state: &AppState, post_id: &str, user_id: &str) -> Result<Vec<Like>> {
    if post_repo::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(AppError::NotFound("Post"));
    }
    post_repo::toggle_like(&state.db, post_id, user_id).await
}

/// Adds a comment to a post and returns the updated comment list, newest
/// first. Fails with `NotFound` if the post is absent.
pub async fn add_comment(
    state: &AppState,
    post_id: &str,
    author_id: &str,
    text: String,
) -> Result<Vec<Comment>> {
    let author = user_repo::find_by_id(&state.db, author_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    if post_repo::find_by_id(&state.db, post_id).await?.is_none() {
        return Err(AppError::NotFound("Post"));
    }

    let comment = Comment {
        post_id: post_id.to_string(),
        user_id: author.id,
        name: author.name,
        avatar: author.avatar,
        text,
        created_at: Utc::now(),
    };
    post_repo::insert_comment(&state.db, &comment).await
}
