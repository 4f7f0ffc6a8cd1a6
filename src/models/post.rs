use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Represents a stored post.
///
/// `name` and `avatar` are a snapshot of the author's profile taken at
/// creation time. They do not update if the author later edits their profile.
#[derive(FromRow, Clone, Debug)]
pub struct PostRow {
    /// The unique identifier for the post.
    pub id: String,
    /// The ID of the owning user.
    pub user_id: String,
    /// The author's name at creation time.
    pub name: String,
    /// The author's avatar at creation time.
    pub avatar: Option<String>,
    /// The body text.
    pub text: String,
    /// The timestamp when the post was created.
    pub created_at: DateTime<Utc>,
}

/// A like on a post. At most one exists per `(post, user)` pair.
#[derive(FromRow, Serialize, Clone, Debug)]
pub struct Like {
    #[serde(skip)]
    pub post_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// A comment on a post, with the author snapshot taken at creation time.
#[derive(FromRow, Serialize, Clone, Debug)]
pub struct Comment {
    #[serde(skip)]
    pub post_id: String,
    pub user_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// The wire representation of a post with its likes and comments attached,
/// both newest-first.
#[derive(Serialize, Clone, Debug)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub avatar: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub likes: Vec<Like>,
    pub comments: Vec<Comment>,
}

impl Post {
    /// Assembles the wire representation from a stored row and its lists.
    pub fn from_row(row: PostRow, likes: Vec<Like>, comments: Vec<Comment>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            name: row.name,
            avatar: row.avatar,
            text: row.text,
            created_at: row.created_at,
            likes,
            comments,
        }
    }
}
