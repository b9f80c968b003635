//! Repository layer for data access operations.
//!
//! Provides async CRUD operations for roles and users behind the store traits.

#[cfg(test)]
pub mod memory;
mod health_check;
mod role_repo;
mod traits;
mod user_repo;

pub use health_check::PoolHealthCheck;
pub use role_repo::RoleRepository;
pub use traits::{RoleStore, StoreHealth, UserStore};
pub use user_repo::UserRepository;

use std::sync::Arc;
use std::time::Duration;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserStore>,
    pub roles: Arc<dyn RoleStore>,
    pub health: Arc<dyn StoreHealth>,
}

impl Repositories {
    /// Creates the diesel-backed repositories.
    ///
    /// # Arguments
    /// * `pool` - The async database connection pool
    /// * `deadline` - Upper bound applied to every store call
    pub fn new(pool: AsyncDbPool, deadline: Duration) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone(), deadline)),
            roles: Arc::new(RoleRepository::new(pool.clone(), deadline)),
            health: Arc::new(PoolHealthCheck::new(pool, deadline)),
        }
    }

    #[cfg(test)]
    pub fn in_memory(store: memory::MemoryStore) -> Self {
        Self {
            users: Arc::new(store.clone()),
            roles: Arc::new(store.clone()),
            health: Arc::new(store),
        }
    }
}
