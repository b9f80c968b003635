use axum::{Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ROLE_TAG;
use crate::api::dto::{CreateRoleRequest, ErrorResponse, RoleResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

pub fn role_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_roles, create_role))
}

/// GET /api/roles - List all roles ordered by id
#[utoipa::path(
    get,
    path = "/",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "All roles", body = Vec<RoleResponse>)
    )
)]
async fn list_roles(State(state): State<AppState>) -> AppResult<Json<Vec<RoleResponse>>> {
    let roles = state.services.roles.list_roles().await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

/// POST /api/roles - Create a role
#[utoipa::path(
    post,
    path = "/",
    tag = ROLE_TAG,
    request_body = CreateRoleRequest,
    responses(
        (status = 201, description = "Role created", body = RoleResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Description already exists", body = ErrorResponse)
    )
)]
async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateRoleRequest>,
) -> AppResult<(StatusCode, Json<RoleResponse>)> {
    let role = state.services.roles.create_role(payload.description).await?;
    Ok((StatusCode::CREATED, Json(RoleResponse::from(role))))
}
