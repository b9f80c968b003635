//! User-related DTOs for API requests and responses.

use crate::models::{UpdateUser, User};
use crate::services::{NewUserInput, UpdateOutcome};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// ============================================================================
// Request DTOs
// ============================================================================

/// Request body for creating a new user.
///
/// Age and non-empty name/phone are enforced by the store, so violations
/// surface as 422 rather than 400.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[schema(example = 1)]
    pub role_id: i32,
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    #[schema(example = "Ana", max_length = 255)]
    pub name: String,
    #[schema(example = 30, minimum = 18)]
    pub age: i32,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(example = "ana@x.com", format = "email", max_length = 255)]
    pub email: String,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    #[schema(example = "123456789", max_length = 20)]
    pub phone: String,
    #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
    #[schema(example = "secret", format = "password")]
    pub password: String,
}

impl CreateUserRequest {
    pub fn into_input(self) -> NewUserInput {
        NewUserInput {
            role_id: self.role_id,
            name: self.name,
            age: self.age,
            email: self.email,
            phone: self.phone,
            password: self.password,
        }
    }
}

/// Request body for a partial update. Absent fields are left unchanged;
/// present ones are applied as given, including `0` and `""`.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(max = 255, message = "Name must be at most 255 characters"))]
    pub name: Option<String>,
    pub age: Option<i32>,
    #[validate(
        email(message = "Invalid email format"),
        length(max = 255, message = "Email must be at most 255 characters")
    )]
    #[schema(format = "email")]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "Phone must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(min = 1, max = 128, message = "Password must be between 1 and 128 characters"))]
    #[schema(format = "password")]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn into_update_user(self) -> UpdateUser {
        UpdateUser {
            name: self.name,
            age: self.age,
            email: self.email,
            phone: self.phone,
            password: self.password,
        }
    }
}

// ============================================================================
// Response DTOs
// ============================================================================

/// User data without the password hash.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub role_id: i32,
    pub name: String,
    pub age: i32,
    pub email: String,
    pub phone: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role_id: user.role_id,
            name: user.name,
            age: user.age,
            email: user.email,
            phone: user.phone,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "User created successfully")]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    Updated,
    NoChanges,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserResponse {
    pub status: UpdateStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
}

impl From<UpdateOutcome> for UpdateUserResponse {
    fn from(outcome: UpdateOutcome) -> Self {
        match outcome {
            UpdateOutcome::Updated(user) => Self {
                status: UpdateStatus::Updated,
                message: "User updated successfully".to_string(),
                user: Some(user.into()),
            },
            UpdateOutcome::NoChanges => Self {
                status: UpdateStatus::NoChanges,
                message: "No fields supplied; nothing to update".to_string(),
                user: None,
            },
        }
    }
}
