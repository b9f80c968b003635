//! Login handler.

use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::AUTH_TAG;
use crate::api::dto::{ErrorResponse, LoginRequest, LoginResponse};
use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;

/// Creates the authentication routes
///
/// # Routes
/// - `POST /login` - Check an email/password pair
pub fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(login))
}

/// POST /login - Authenticate user
///
/// An unknown email answers 404 unless `auth.uniform_login_errors` is set,
/// in which case it answers 401 like a wrong password.
#[utoipa::path(
    post,
    path = "/login",
    tag = AUTH_TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorResponse),
        (status = 401, description = "Incorrect password", body = ErrorResponse),
        (status = 404, description = "No user with this email", body = ErrorResponse)
    )
)]
async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let result = state
        .services
        .auth
        .authenticate(&payload.email, &payload.password)
        .await;

    match result {
        Ok(user) => Ok(Json(LoginResponse::from(user))),
        Err(AppError::NotFound { .. } | AppError::Unauthorized { .. })
            if state.auth.uniform_login_errors =>
        {
            Err(AppError::unauthorized("Invalid credentials"))
        }
        Err(e) => Err(e),
    }
}
