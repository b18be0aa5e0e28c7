//! Guzei
//!
//! A small user service:
//! - Registration with field validation and a password policy
//! - Paginated user listing
//! - JWT authentication tokens and protected routes
//! - In-memory or PostgreSQL user store

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::{
    auth::{JwtConfig, JwtService},
    storage::{PostgresConfig, StorageConfig, StorageFactory, StorageType},
    user::{Argon2Hasher, UserService},
};
use tracing::{info, warn};

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_backend = StorageType::from_str(&config.storage.backend).ok_or_else(|| {
        anyhow::anyhow!("Unknown storage backend: {}", config.storage.backend)
    })?;

    info!("Storage backend: {:?}", storage_backend);

    let storage_config = match storage_backend {
        StorageType::InMemory => StorageConfig::in_memory(),
        StorageType::Postgres => {
            StorageConfig::postgres(postgres_config(config), config.database.auto_migrate)
        }
    };

    let repository = StorageFactory::create_user_repository(&storage_config).await?;

    let hasher = Argon2Hasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;

    let user_service = UserService::new(repository, Arc::new(hasher));

    let jwt_config = JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_ttl_hours,
        config.server.base_url.clone(),
    );

    if jwt_config.uses_default_secret() {
        warn!(
            "Using the default JWT secret. Set APP__AUTH__JWT_SECRET before exposing this service."
        );
    }

    Ok(AppState::new(
        Arc::new(user_service),
        Arc::new(JwtService::new(jwt_config)),
    ))
}

/// Pool settings from the `database` section
pub fn postgres_config(config: &AppConfig) -> PostgresConfig {
    PostgresConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        connect_timeout_secs: config.database.connect_timeout_secs,
        idle_timeout_secs: config.database.idle_timeout_secs,
    }
}
