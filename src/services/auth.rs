use argon2::{
    Argon2, ParamsBuilder,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::Utc;
use rand::{RngCore, rngs::OsRng};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::crypto::token;
use crate::error::{AppError, Result};
use crate::models::user::{PublicUser, User};
use crate::repositories::user as user_repo;
use crate::services::users as users_service;
use crate::state::AppState;

/// The memory cost for Argon2 in MB.
const ARGON2_MEMORY_MB: u32 = 19;
/// The number of iterations for Argon2.
const ARGON2_ITERATIONS: u32 = 3;
/// The parallelism factor for Argon2.
const ARGON2_PARALLELISM: u32 = 6;

/// Hashes a password using Argon2id with a fresh random salt.
///
/// # Arguments
///
/// * `password` - The password to hash.
///
/// # Returns
///
/// A `Result` containing the PHC-format hash string.
fn hash_password(password: &str) -> Result<String> {
    let mut password_bytes = password.as_bytes().to_vec();

    let mut salt_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AppError::Internal(format!("Salt encoding error: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        ParamsBuilder::new()
            .m_cost(ARGON2_MEMORY_MB * 1024)
            .t_cost(ARGON2_ITERATIONS)
            .p_cost(ARGON2_PARALLELISM)
            .build()
            .map_err(|e| AppError::Internal(format!("Argon2 params: {}", e)))?,
    );

    let password_hash = argon2
        .hash_password(&password_bytes, &salt)
        .map_err(|e| AppError::Internal(format!("Argon2 hash error: {}", e)))?
        .to_string();

    password_bytes.zeroize();
    tracing::debug!("Password hashed successfully with Argon2");
    Ok(password_hash)
}

/// Verifies a password against a stored hash. The comparison inside
/// `verify_password` is constant-time.
fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let mut password_bytes = password.as_bytes().to_vec();
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Hash parse error: {}", e)))?;
    let result = Argon2::default()
        .verify_password(&password_bytes, &parsed_hash)
        .is_ok();

    password_bytes.zeroize();
    Ok(result)
}

/// Registers a new user and issues a session token.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `name` - The user's display name.
/// * `email` - The user's email address.
/// * `password` - The user's password (hashed before storage).
/// * `github` - The user's optional GitHub handle.
///
/// # Returns
///
/// A `Result` containing the token and the public user projection.
pub async fn register(
    state: &AppState,
    name: String,
    email: String,
    password: String,
    github: Option<String>,
) -> Result<(String, PublicUser)> {
    if user_repo::find_by_email(&state.db, &email).await?.is_some() {
        return Err(AppError::DuplicateEmail);
    }

    let user = User {
        id: Uuid::new_v4().to_string(),
        name,
        email,
        password: hash_password(&password)?,
        bio: None,
        github,
        avatar: None,
        created_at: Utc::now(),
    };
    user_repo::insert_user(&state.db, &user).await?;
    tracing::info!("✅ User registered: {}", user.id);

    let token = token::issue(
        &state.encoding_key,
        &user.id,
        state.config.session_duration_days,
    )?;

    // A fresh account has no follow edges yet.
    let public = PublicUser::from_user(user, Vec::new(), Vec::new());
    Ok((token, public))
}

/// Authenticates a user and issues a session token.
///
/// Unknown email and wrong password both fail with `InvalidCredentials`, so
/// the response never leaks whether the account exists.
pub async fn login(state: &AppState, email: String, password: String) -> Result<(String, PublicUser)> {
    let user = user_repo::find_by_email(&state.db, &email)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !verify_password(&password, &user.password)? {
        return Err(AppError::InvalidCredentials);
    }
    tracing::info!("✅ User authenticated: {}", user.id);

    let token = token::issue(
        &state.encoding_key,
        &user.id,
        state.config.session_duration_days,
    )?;

    let public = users_service::to_public(state, user).await?;
    Ok((token, public))
}

/// Resolves the public projection of the user a verified token refers to.
/// Fails with `NotFound` if the ID no longer resolves.
pub async fn current_user(state: &AppState, user_id: &str) -> Result<PublicUser> {
    let user = user_repo::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::NotFound("User"))?;
    users_service::to_public(state, user).await
}
