use utoipa::OpenApi;

pub const USER_TAG: &str = "User";
pub const ROLE_TAG: &str = "Role";
pub const AUTH_TAG: &str = "Auth";
pub const HEALTH_TAG: &str = "Health";

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";
pub const SWAGGER_UI_PATH: &str = "/swagger-ui";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Soft Skills Users",
        description = "User and role management with email/password login",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = USER_TAG, description = "User management endpoints"),
        (name = ROLE_TAG, description = "Role listing and creation"),
        (name = AUTH_TAG, description = "Authentication endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;
