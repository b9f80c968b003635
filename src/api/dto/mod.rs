//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `auth` - Login request/response
//! - `user` - User-related request/response DTOs
//! - `role` - Role listing and creation
//! - `health` - Health check bodies
//! - `error` - Common error response DTOs

mod auth;
mod error;
mod health;
mod role;
mod user;

pub use auth::{LoginRequest, LoginResponse};
pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use role::{CreateRoleRequest, RoleResponse};
pub use user::{
    CreateUserRequest, CreateUserResponse, UpdateStatus, UpdateUserRequest, UpdateUserResponse,
    UserResponse,
};
