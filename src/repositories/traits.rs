//! Store seams between the services and the database.
//!
//! Services hold these as `Arc<dyn ...>` so the diesel repositories can be
//! swapped for an in-memory store in unit tests.

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{NewRole, NewUser, Role, UpdateUser, User};

/// Persistence operations over `utilizadores`.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts one user and returns it with its assigned id.
    async fn create(&self, new_user: NewUser) -> AppResult<User>;

    async fn find_by_id(&self, user_id: i32) -> AppResult<Option<User>>;

    /// Exact, case-sensitive match.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// All users ordered by id.
    async fn list_all(&self) -> AppResult<Vec<User>>;

    /// Applies the supplied columns in one statement. `None` when no row matched.
    ///
    /// Callers must not pass an empty change set.
    async fn update(&self, user_id: i32, changes: UpdateUser) -> AppResult<Option<User>>;

    /// Returns the number of deleted rows (0 or 1).
    async fn delete(&self, user_id: i32) -> AppResult<usize>;

    /// Bulk insert skipping rows that conflict; returns rows actually inserted.
    async fn seed(&self, rows: Vec<NewUser>) -> AppResult<usize>;
}

/// Persistence operations over `cargos`.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn create(&self, new_role: NewRole) -> AppResult<Role>;

    async fn find_by_id(&self, role_id: i32) -> AppResult<Option<Role>>;

    /// All roles ordered by id.
    async fn list_all(&self) -> AppResult<Vec<Role>>;

    /// Inserts rows with explicit ids skipping conflicts, then realigns the
    /// id sequence. Returns rows actually inserted.
    async fn seed(&self, rows: Vec<NewRole>) -> AppResult<usize>;
}

/// Connectivity check used by the readiness endpoints.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> AppResult<()>;
}
