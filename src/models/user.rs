use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Represents a stored user record.
///
/// Deliberately does not implement `Serialize`: the `password` field holds the
/// Argon2 hash and must never appear in an external representation. Everything
/// leaving the process goes through [`PublicUser`].
#[derive(FromRow, Clone, Debug)]
pub struct User {
    /// The unique identifier for the user.
    pub id: String,
    /// The user's display name.
    pub name: String,
    /// The user's email address (unique).
    pub email: String,
    /// The user's hashed password.
    pub password: String,
    /// The user's bio.
    pub bio: Option<String>,
    /// The user's GitHub handle.
    pub github: Option<String>,
    /// The user's avatar reference.
    pub avatar: Option<String>,
    /// The timestamp when the user was created.
    pub created_at: DateTime<Utc>,
}

/// The password-stripped projection of a user, with the follow graph attached.
#[derive(Serialize, Clone, Debug)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub bio: Option<String>,
    pub github: Option<String>,
    pub avatar: Option<String>,
    /// IDs of users following this user, newest edge first.
    pub followers: Vec<String>,
    /// IDs of users this user follows, newest edge first.
    pub following: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl PublicUser {
    /// Builds the projection from a stored record and its follow lists.
    pub fn from_user(user: User, followers: Vec<String>, following: Vec<String>) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            bio: user.bio,
            github: user.github,
            avatar: user.avatar,
            followers,
            following,
            created_at: user.created_at,
        }
    }
}
