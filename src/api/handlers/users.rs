//! User CRUD request handlers.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    CreateUserRequest, CreateUserResponse, ErrorResponse, UpdateUserRequest, UpdateUserResponse,
    UserResponse,
};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates user-related routes.
///
/// Routes:
/// - GET /        - List all users
/// - POST /       - Create a new user
/// - GET /{id}    - Get user by ID
/// - PATCH /{id}  - Partially update user by ID
/// - DELETE /{id} - Delete user by ID
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
}

/// GET /api/users - List all users ordered by id
#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    responses(
        (status = 200, description = "All users", body = Vec<UserResponse>),
        (status = 503, description = "Store unavailable", body = ErrorResponse)
    )
)]
async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.services.users.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// POST /api/users - Create new user
#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = CreateUserResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Unknown role, age below 18, or empty name/phone", body = ErrorResponse)
    )
)]
async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<CreateUserResponse>)> {
    let user = state.services.users.create_user(payload.into_input()).await?;
    let response = CreateUserResponse {
        id: user.id,
        message: "User created successfully".to_string(),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/users/{id} - Get user by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<UserResponse>> {
    let Path(id) = path?;
    let user = state.services.users.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PATCH /api/users/{id} - Partially update user
///
/// Only the supplied fields change. An empty body answers `no_changes`
/// without contacting the store.
#[utoipa::path(
    patch,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Update applied or nothing to apply", body = UpdateUserResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 422, description = "Constraint violation", body = ErrorResponse)
    )
)]
async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UpdateUserResponse>> {
    let Path(id) = path?;
    let outcome = state
        .services
        .users
        .update_user(id, payload.into_update_user())
        .await?;
    Ok(Json(UpdateUserResponse::from(outcome)))
}

/// DELETE /api/users/{id} - Delete user
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
