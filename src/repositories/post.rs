use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::Result,
    models::post::{Comment, Like, PostRow},
};

/// Inserts a new post.
pub async fn insert_post(pool: &SqlitePool, post: &PostRow) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO posts (id, user_id, name, avatar, text, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&post.id)
    .bind(&post.user_id)
    .bind(&post.name)
    .bind(&post.avatar)
    .bind(&post.text)
    .bind(post.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Finds a post by its ID.
pub async fn find_by_id(pool: &SqlitePool, post_id: &str) -> Result<Option<PostRow>> {
    let post = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, user_id, name, avatar, text, created_at
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;
    Ok(post)
}

/// Returns every post, newest first. Feed order is creation time only;
/// likes and comments never move a post.
pub async fn list_all(pool: &SqlitePool) -> Result<Vec<PostRow>> {
    let posts = sqlx::query_as::<_, PostRow>(
        r#"
        SELECT id, user_id, name, avatar, text, created_at
        FROM posts
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(posts)
}

/// Returns every like across all posts, newest change first.
pub async fn all_likes(pool: &SqlitePool) -> Result<Vec<Like>> {
    let likes = sqlx::query_as::<_, Like>(
        r#"
        SELECT post_id, user_id, created_at
        FROM likes
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(likes)
}

/// Returns every comment across all posts, newest first.
pub async fn all_comments(pool: &SqlitePool) -> Result<Vec<Comment>> {
    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT post_id, user_id, name, avatar, text, created_at
        FROM comments
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(comments)
}

/// Toggles the `(post, user)` like inside one transaction and returns the
/// post's updated like list, newest change first.
///
/// The transaction plus the `(post_id, user_id)` primary key serialize
/// concurrent toggles at document granularity: a duplicate like cannot exist
/// under any interleaving.
pub async fn toggle_like(pool: &SqlitePool, post_id: &str, user_id: &str) -> Result<Vec<Like>> {
    let mut tx = pool.begin().await?;

    let existing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM likes
        WHERE post_id = ? AND user_id = ?
        "#,
    )
    .bind(post_id)
    .bind(user_id)
    .fetch_one(&mut *tx)
    .await?;

    if existing > 0 {
        sqlx::query("DELETE FROM likes WHERE post_id = ? AND user_id = ?")
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    } else {
        sqlx::query("INSERT INTO likes (post_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(post_id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
    }

    let likes = sqlx::query_as::<_, Like>(
        r#"
        SELECT post_id, user_id, created_at
        FROM likes
        WHERE post_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(post_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(likes)
}

/// Appends a comment and returns the post's updated comment list,
/// newest first.
pub async fn insert_comment(pool: &SqlitePool, comment: &Comment) -> Result<Vec<Comment>> {
    sqlx::query(
        r#"
        INSERT INTO comments (post_id, user_id, name, avatar, text, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&comment.post_id)
    .bind(&comment.user_id)
    .bind(&comment.name)
    .bind(&comment.avatar)
    .bind(&comment.text)
    .bind(comment.created_at)
    .execute(pool)
    .await?;

    let comments = sqlx::query_as::<_, Comment>(
        r#"
        SELECT post_id, user_id, name, avatar, text, created_at
        FROM comments
        WHERE post_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(&comment.post_id)
    .fetch_all(pool)
    .await?;
    Ok(comments)
}
