use chrono::Utc;
use sqlx::SqlitePool;

use crate::{error::Result, models::user::User};

/// Inserts a new user.
pub async fn insert_user(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, name, email, password, bio, github, avatar, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(&user.name)
    .bind(&user.email)
    .bind(&user.password)
    .bind(&user.bio)
    .bind(&user.github)
    .bind(&user.avatar)
    .bind(user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Finds a user by their email address.
pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, bio, github, avatar, created_at
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Finds a user by their ID.
pub async fn find_by_id(pool: &SqlitePool, user_id: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, bio, github, avatar, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Returns the IDs of users following `user_id`, newest edge first.
pub async fn followers_of(pool: &SqlitePool, user_id: &str) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT follower_id
        FROM follows
        WHERE followed_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Returns the IDs of users `user_id` follows, newest edge first.
pub async fn following_of(pool: &SqlitePool, user_id: &str) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar::<_, String>(
        r#"
        SELECT followed_id
        FROM follows
        WHERE follower_id = ?
        ORDER BY created_at DESC, rowid DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(ids)
}

/// Checks whether a follow edge already exists.
pub async fn follow_exists(pool: &SqlitePool, follower_id: &str, followed_id: &str) -> Result<bool> {
    let count = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM follows
        WHERE follower_id = ? AND followed_id = ?
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

/// Inserts a follow edge. The single-row edge makes the mutation atomic by
/// construction; both users' lists are projections of this table.
pub async fn insert_follow(pool: &SqlitePool, follower_id: &str, followed_id: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO follows (follower_id, followed_id, created_at)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(follower_id)
    .bind(followed_id)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

/// Returns up to `limit` users the requester does not already follow,
/// excluding the requester, in store iteration order.
pub async fn suggestions(pool: &SqlitePool, requester_id: &str, limit: i64) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, password, bio, github, avatar, created_at
        FROM users
        WHERE id != ?
          AND id NOT IN (SELECT followed_id FROM follows WHERE follower_id = ?)
        LIMIT ?
        "#,
    )
    .bind(requester_id)
    .bind(requester_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(users)
}
