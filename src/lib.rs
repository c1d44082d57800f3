pub mod auth;
pub mod config;
pub mod db;
pub mod error;

use std::sync::Arc;
use std::time::Duration;

use actix_web::HttpResponse;

pub use error::AppError;
pub type Result<T> = std::result::Result<T, AppError>;
pub use config::Settings;

pub use auth::{AuthService, Claims, PasswordHasher, TokenIssuer};
pub use db::{Account, AccountStore, AccountSummary, DbOperations, InMemoryStore, Role};

/// Health check endpoint handler
/// Returns a JSON response with server status and timestamp
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    /// Connect to Postgres, run pending migrations and wire the auth
    /// service. Fails fast on an unreachable database or a missing
    /// signing secret.
    pub async fn new(config: Settings) -> Result<Self> {
        let db = DbOperations::new_with_options(
            &config.database.url,
            config.database.max_connections,
            Duration::from_secs(5),
        )
        .await?;
        db.run_migrations().await?;

        Self::with_store(config, Arc::new(db))
    }

    /// Wire the auth service over any account store. Tests use this with
    /// the in-memory store; `new` uses it with Postgres.
    pub fn with_store(config: Settings, store: Arc<dyn AccountStore>) -> Result<Self> {
        let tokens = TokenIssuer::new(&config.auth.signing_secret, config.auth.token_ttl_secs)?;
        let auth = AuthService::new(store, PasswordHasher::new(), tokens);

        Ok(Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
        })
    }
}
