use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Role;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 255, message = "Description must be between 1 and 255 characters"))]
    #[schema(example = "Coordenador", min_length = 1, max_length = 255)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Administrador")]
    pub description: String,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            description: role.description,
        }
    }
}
