pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use chrono::Duration;
use std::sync::Arc;

pub use config::Settings;
pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;

pub use auth::{ExpiryPolicy, TokenService};
pub use db::{Account, AccountStatus, MemoryStore, PgStore, Storage};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub store: Arc<dyn Storage>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Connects to Postgres and creates the account table. Any failure here
    /// is fatal to the process (fail-fast boot).
    pub async fn new(config: Settings) -> Result<Self> {
        let store = PgStore::connect(&config.database.url, config.database.max_connections)
            .await
            .map_err(AppError::Storage)?;
        store.init().await.map_err(AppError::Storage)?;

        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Builds state around an existing storage backend. Used by the tests
    /// with `MemoryStore` and by `new` with `PgStore`.
    pub fn with_store(config: Settings, store: Arc<dyn Storage>) -> Self {
        let tokens = TokenService::new(
            config.auth.jwt_secret.clone(),
            ExpiryPolicy::Relative(Duration::hours(config.auth.token_ttl_hours)),
        );

        Self {
            config: Arc::new(config),
            store,
            tokens: Arc::new(tokens),
        }
    }
}
