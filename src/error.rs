use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A registration attempt with an email that is already taken.
    #[error("User already exists")]
    DuplicateEmail,

    /// A failed login. Unknown email and wrong password are not distinguished.
    #[error("Invalid Credentials")]
    InvalidCredentials,

    /// A missing, malformed, or expired session token.
    #[error("Authentication failed")]
    Unauthenticated,

    /// A resource not found error.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A follow attempt over an edge that already exists.
    #[error("User already followed")]
    AlreadyFollowing,

    /// A failed lookup against the GitHub API.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An internal server error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::DuplicateEmail => {
                tracing::debug!("Registration with existing email");
                (StatusCode::BAD_REQUEST, "User already exists".to_string())
            }

            AppError::InvalidCredentials => {
                tracing::debug!("Login failed");
                (StatusCode::BAD_REQUEST, "Invalid Credentials".to_string())
            }

            AppError::Unauthenticated => {
                tracing::warn!("Authentication failed");
                (StatusCode::UNAUTHORIZED, "Token is not valid".to_string())
            }

            AppError::NotFound(what) => {
                tracing::debug!("{} not found", what);
                (StatusCode::NOT_FOUND, format!("{} not found", what))
            }

            AppError::AlreadyFollowing => {
                tracing::debug!("Follow over an existing edge");
                (StatusCode::BAD_REQUEST, "User already followed".to_string())
            }

            AppError::Upstream(ref msg) => {
                tracing::warn!("GitHub lookup failed: {}", msg);
                (StatusCode::NOT_FOUND, "No Github profile found".to_string())
            }

            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server Error".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "msg": message
        }))
        .unwrap_or_else(|_| r#"{"msg":"Server Error"}"#.to_string());

        (status, body).into_response()
    }
}
