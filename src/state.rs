//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::config::AuthConfig;
use crate::db::AsyncDbPool;
use crate::repositories::{Repositories, StoreHealth};
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// This struct is designed to be used with Axum's State extractor.
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    /// All business logic services
    pub services: Services,
    /// Connectivity check for the health endpoints
    pub health: Arc<dyn StoreHealth>,
    /// Login response policy
    pub auth: AuthConfig,
}

impl AppState {
    /// Creates a new AppState from a database connection pool.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    /// * `query_timeout` - Deadline applied to every store call
    /// * `auth` - Login response policy
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let state = AppState::new(pool, Duration::from_secs(10), settings.auth.clone());
    /// ```
    pub fn new(pool: AsyncDbPool, query_timeout: Duration, auth: AuthConfig) -> Self {
        Self::from_repositories(Repositories::new(pool, query_timeout), auth)
    }

    pub fn from_repositories(repos: Repositories, auth: AuthConfig) -> Self {
        let health = repos.health.clone();
        Self {
            services: Services::new(repos),
            health,
            auth,
        }
    }
}
