//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod auth_service;
mod role_service;
pub mod seed_service;
mod user_service;

pub use auth_service::{AuthService, AuthenticatedUser};
pub use role_service::RoleService;
pub use seed_service::{SeedReport, SeedService};
pub use user_service::{NewUserInput, UpdateOutcome, UserService};

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// This struct is designed to be used as Axum application state.
/// Cloning only bumps reference counts.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub roles: RoleService,
    pub auth: AuthService,
    pub seed: SeedService,
}

impl Services {
    /// Creates a new Services instance from Repositories.
    pub fn new(repos: Repositories) -> Self {
        Self {
            users: UserService::new(repos.users.clone()),
            roles: RoleService::new(repos.roles.clone()),
            auth: AuthService::new(repos.users.clone()),
            seed: SeedService::new(repos.roles, repos.users),
        }
    }
}
