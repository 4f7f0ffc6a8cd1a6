use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// The claims embedded in a session token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The user's ID.
    pub sub: String,
    /// The expiry timestamp (seconds since the epoch).
    pub exp: usize,
}

/// Signs a session token for the given user.
///
/// # Arguments
///
/// * `key` - The process-wide encoding key.
/// * `user_id` - The ID of the user the token identifies.
/// * `duration_days` - How many days the token stays valid.
///
/// # Returns
///
/// A `Result` containing the signed token.
pub fn issue(key: &EncodingKey, user_id: &str, duration_days: i64) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (Utc::now() + Duration::days(duration_days)).timestamp() as usize,
    };

    encode(&Header::default(), &claims, key)
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
}

/// Verifies a session token and extracts the user ID it carries.
///
/// Malformed, tampered, and expired tokens all collapse into
/// `Unauthenticated`.
pub fn verify(key: &DecodingKey, token: &str) -> Result<String> {
    let data =
        decode::<Claims>(token, key, &Validation::default()).map_err(|_| AppError::Unauthenticated)?;
    Ok(data.claims.sub)
}
