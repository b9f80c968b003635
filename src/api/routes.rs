//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use std::time::Duration;

use axum::{Router, http::StatusCode, middleware};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::{ApiDoc, OPENAPI_JSON_PATH, SWAGGER_UI_PATH};
use crate::api::handlers;
use crate::api::middleware::{global_error_handler, logging_middleware, request_id_middleware};
use crate::config::Settings;
use crate::state::AppState;

/// Knobs for [`create_router`] taken from the settings.
#[derive(Debug, Clone, Copy)]
pub struct RouterOptions {
    pub request_timeout: Duration,
    /// Serve Swagger UI and the OpenAPI document
    pub enable_docs: bool,
}

impl RouterOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            request_timeout: Duration::from_secs(settings.server.request_timeout),
            enable_docs: !settings.application.environment.is_production(),
        }
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            enable_docs: true,
        }
    }
}

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers wrap everything added before them, so the last one runs first:
/// 1. Compression
/// 2. Request ID - generates/propagates `x-request-id`
/// 3. Logging - `http_request` span per request
/// 4. Error envelope - every 4xx/5xx body becomes an `ErrorResponse`
/// 5. Panic recovery and request timeout
///
/// # Routes
/// - `POST /login`
/// - `/api/users`, `/api/roles`
/// - `/health`, `/health/ready`, `/health/live`
/// - `/swagger-ui`, `/api-docs/openapi.json` unless docs are disabled
///
/// # Example
/// ```ignore
/// let state = AppState::new(pool, query_timeout, settings.auth.clone());
/// let router = create_router(state, RouterOptions::from_settings(&settings));
/// ```
pub fn create_router(state: AppState, options: RouterOptions) -> Router {
    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(handlers::auth::auth_routes())
        .merge(handlers::health::health_routes())
        .nest("/api/users", handlers::users::user_routes())
        .nest("/api/roles", handlers::roles::role_routes())
        .split_for_parts();

    let router = if options.enable_docs {
        router.merge(SwaggerUi::new(SWAGGER_UI_PATH).url(OPENAPI_JSON_PATH, openapi))
    } else {
        router
    };

    router
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            options.request_timeout,
        ))
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .with_state(state)
}
