//! Authentication-related Data Transfer Objects

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::services::AuthenticatedUser;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Email the account was registered with (exact match)
    #[validate(length(min = 1, max = 255, message = "Email is required"))]
    #[schema(example = "ana@x.com", format = "email")]
    pub email: String,
    /// Plaintext password
    #[validate(length(min = 1, message = "Password is required"))]
    #[schema(example = "secret", format = "password")]
    pub password: String,
}

/// Successful login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Ana")]
    pub name: String,
    #[schema(example = "Login successful")]
    pub message: String,
}

impl From<AuthenticatedUser> for LoginResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            message: "Login successful".to_string(),
        }
    }
}
