use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{NewRole, Role};
use crate::repositories::RoleStore;

#[derive(Clone)]
pub struct RoleService {
    repo: Arc<dyn RoleStore>,
}

impl RoleService {
    pub fn new(repo: Arc<dyn RoleStore>) -> Self {
        Self { repo }
    }

    pub async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.repo.list_all().await
    }

    pub async fn get_role(&self, id: i32) -> AppResult<Role> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("role", "id", id))
    }

    /// # Errors
    /// `ConstraintViolation` (unique) when the description already exists.
    pub async fn create_role(&self, description: String) -> AppResult<Role> {
        let role = self.repo.create(NewRole::new(description)).await?;
        tracing::info!(role_id = role.id, "Role created");
        Ok(role)
    }
}
