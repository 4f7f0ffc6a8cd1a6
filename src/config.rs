use std::env;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The URL of the SQLite database.
    pub database_url: String,
    /// The secret used to sign session tokens.
    pub token_secret: Zeroizing<String>,
    /// The port the server listens on.
    pub port: u16,
    /// The duration of a session in days.
    pub session_duration_days: i64,
    /// The deployment environment (`production` enables secure cookies).
    pub app_env: String,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let token_secret = env::var("TOKEN_SECRET")
            .context("TOKEN_SECRET must be set (generate with: openssl rand -hex 32)")?;

        if token_secret.len() < 32 {
            anyhow::bail!("TOKEN_SECRET must be at least 32 characters");
        }

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .context("DATABASE_URL must be set")?,
            token_secret: Zeroizing::new(token_secret),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .context("Invalid PORT")?,
            session_duration_days: env::var("SESSION_DURATION_DAYS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .context("Invalid SESSION_DURATION_DAYS")?,
            app_env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        })
    }
}
