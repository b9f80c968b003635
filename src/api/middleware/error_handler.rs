//! Error handler for converting AppError to HTTP responses.
//!
//! Every failure leaves the API as an [`ErrorResponse`] body. Messages for
//! server-side failures are sanitized; the source chain is only logged.

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::{AppError, ConstraintKind};

/// Largest error body the envelope middleware will buffer and rewrite.
const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

/// Maps an AppError variant to its corresponding HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            ..
        } => StatusCode::CONFLICT,
        AppError::ConstraintViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::ConnectionFailure { .. } | AppError::Timeout { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::ConstraintViolation {
            kind: ConstraintKind::Unique,
            ..
        } => "DUPLICATE_ENTRY",
        AppError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::ConnectionFailure { .. } => "SERVICE_UNAVAILABLE",
        AppError::Timeout { .. } => "TIMEOUT",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Builds the public body for an error.
pub fn error_to_body(error: &AppError) -> ErrorResponse {
    let code = error_to_code(error);

    match error {
        AppError::NotFound {
            entity,
            field,
            value,
        } => ErrorResponse::new(code, format!("{} not found", capitalize(entity))).with_details(
            json!({
                "entity": entity,
                "field": field,
                "value": value,
            }),
        ),
        AppError::ConstraintViolation {
            kind,
            entity,
            field,
            value,
        } => {
            let message = match kind {
                ConstraintKind::Unique => format!("A {entity} with this {field} already exists"),
                ConstraintKind::ForeignKey => format!("Referenced {field} does not exist"),
                ConstraintKind::Check => format!("Value for {entity}.{field} is not allowed"),
                ConstraintKind::NotNull => format!("{entity}.{field} is required"),
            };
            let mut details = json!({
                "kind": kind,
                "entity": entity,
                "field": field,
            });
            if let Some(value) = value {
                details["value"] = json!(value);
            }
            ErrorResponse::new(code, message).with_details(details)
        }
        AppError::Validation { field, reason } => {
            ErrorResponse::new(code, format!("Validation failed for {field}: {reason}"))
                .with_details(json!({ "field": field, "reason": reason }))
        }
        AppError::ValidationErrors { errors } => {
            ErrorResponse::new(code, "Request validation failed")
                .with_details(json!({ "errors": errors }))
        }
        AppError::BadRequest { message } | AppError::Unauthorized { message } => {
            ErrorResponse::new(code, message.as_str())
        }
        AppError::ConnectionFailure { .. } => {
            ErrorResponse::new(code, "Database connection unavailable")
        }
        AppError::Timeout { operation } => ErrorResponse::new(code, "The operation timed out")
            .with_details(json!({ "operation": operation })),
        AppError::Database { operation, .. } => {
            ErrorResponse::new(code, "Database operation failed")
                .with_details(json!({ "operation": operation }))
        }
        AppError::Configuration { key, .. } => ErrorResponse::new(code, "Configuration error")
            .with_details(json!({ "key": key })),
        AppError::Internal { .. } => ErrorResponse::new(code, "An internal error occurred"),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        (status, Json(error_to_body(&self))).into_response()
    }
}

/// Default body for error responses produced outside the handlers
/// (unmatched routes, wrong methods, ...).
fn fallback_body(status: StatusCode) -> ErrorResponse {
    let code = match status {
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::REQUEST_TIMEOUT => "REQUEST_TIMEOUT",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_client_error() => "BAD_REQUEST",
        _ => "INTERNAL_ERROR",
    };
    let message = status.canonical_reason().unwrap_or("Request failed");
    ErrorResponse::new(code, message)
}

/// Makes every 4xx/5xx response carry an `ErrorResponse` with the request id.
///
/// JSON error bodies get `request_id` filled in; other error bodies are
/// replaced by a body derived from the status code. Must run inside
/// `request_id_middleware`.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));

    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_ERROR_BODY_BYTES)
        .await
        .unwrap_or_default();

    let mut error_response = if is_json {
        match serde_json::from_slice::<ErrorResponse>(&bytes) {
            Ok(parsed) => parsed,
            // structured bodies of another shape (health reports) pass through
            Err(_) => return Response::from_parts(parts, Body::from(bytes)),
        }
    } else {
        fallback_body(status)
    };

    if let Some(id) = request_id {
        if error_response.request_id.is_none() {
            error_response = error_response.with_request_id(&id);
        }
    }

    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    let mut rebuilt = Json(error_response).into_response();
    *rebuilt.status_mut() = status;
    rebuilt.headers_mut().extend(parts.headers);
    rebuilt
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    fn not_found() -> AppError {
        AppError::not_found("user", "id", 123)
    }

    fn violation(kind: ConstraintKind) -> AppError {
        AppError::ConstraintViolation {
            kind,
            entity: "user".to_string(),
            field: "email".to_string(),
            value: Some("ana@x.com".to_string()),
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (not_found(), StatusCode::NOT_FOUND, "NOT_FOUND"),
            (
                violation(ConstraintKind::Unique),
                StatusCode::CONFLICT,
                "DUPLICATE_ENTRY",
            ),
            (
                violation(ConstraintKind::ForeignKey),
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONSTRAINT_VIOLATION",
            ),
            (
                violation(ConstraintKind::Check),
                StatusCode::UNPROCESSABLE_ENTITY,
                "CONSTRAINT_VIOLATION",
            ),
            (
                AppError::unauthorized("Incorrect password"),
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
            ),
            (
                AppError::BadRequest {
                    message: "bad".to_string(),
                },
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
            ),
            (
                AppError::ValidationErrors { errors: vec![] },
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::Timeout {
                    operation: "list users".to_string(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "TIMEOUT",
            ),
            (
                AppError::ConnectionFailure {
                    source: anyhow::anyhow!("refused"),
                },
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
            ),
        ];

        for (error, status, code) in cases {
            assert_eq!(error_to_status_code(&error), status, "{error:?}");
            assert_eq!(error_to_code(&error), code, "{error:?}");
        }
    }

    #[test]
    fn test_not_found_body() {
        let body = error_to_body(&not_found());
        assert_eq!(body.message, "User not found");
        assert_eq!(
            body.details,
            Some(json!({"entity": "user", "field": "id", "value": "123"}))
        );
    }

    #[test]
    fn test_unique_violation_body() {
        let body = error_to_body(&violation(ConstraintKind::Unique));
        assert_eq!(body.message, "A user with this email already exists");
        let details = body.details.unwrap();
        assert_eq!(details["kind"], "unique");
        assert_eq!(details["value"], "ana@x.com");
    }

    #[tokio::test]
    async fn test_server_errors_are_sanitized() {
        let error = AppError::Database {
            operation: "select users".to_string(),
            source: anyhow::anyhow!("password=hunter2 host=db.internal"),
        };
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let text = body_json(response).await.to_string();
        assert!(!text.contains("hunter2"));
        assert!(text.contains("DATABASE_ERROR"));
    }

    #[tokio::test]
    async fn test_envelope_adds_request_id() {
        use axum::{Router, middleware, routing::get};
        use tower::ServiceExt;

        async fn missing() -> Result<(), AppError> {
            Err(AppError::not_found("user", "id", 7))
        }

        let app = Router::new()
            .route("/missing", get(missing))
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(super::super::request_id_middleware));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header("x-request-id", "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["request_id"], "req-7");
        assert_eq!(body["code"], "NOT_FOUND");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nowhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert!(body["request_id"].is_string());
    }
}
