use jsonwebtoken::{DecodingKey, EncodingKey};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::error::Result;
use crate::realtime::bus::NotificationBus;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The database connection pool.
    pub db: SqlitePool,
    /// The application's configuration.
    pub config: Config,
    /// The key used to sign session tokens.
    pub encoding_key: EncodingKey,
    /// The key used to verify session tokens.
    pub decoding_key: DecodingKey,
    /// The realtime notification channel registry.
    pub bus: NotificationBus,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub async fn new(config: &Config) -> Result<Self> {
        let db = crate::db::create_pool(&config.database_url).await?;
        crate::db::migrate(&db).await?;
        tracing::info!("✅ SQLite pool initialized and schema applied");

        // Derived once at startup; never rotated at runtime.
        let encoding_key = EncodingKey::from_secret(config.token_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.token_secret.as_bytes());
        tracing::info!("✅ Session token keys derived");

        let bus = NotificationBus::new();
        tracing::info!("✅ Notification bus initialized");

        Ok(AppState {
            db,
            config: config.clone(),
            encoding_key,
            decoding_key,
            bus,
        })
    }
}
