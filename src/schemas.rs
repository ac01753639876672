use axum::{http::StatusCode, response::Json};
use model::AccountError;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::{OpenApi, ToSchema};

use crate::handlers::admin::{AdminConfigResponse, ChangeListResponse, FieldsetResponse};
use crate::handlers::users::{CreateUserRequest, UpdateUserRequest, UserResponse};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
}

/// API response wrapper
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            success: false,
        }
    }
}

/// Map an account error to the status code and payload returned to API clients.
///
/// Validation errors are the caller's fault (400), a taken email is a conflict
/// (409), anything else is reported as an internal error without details.
pub fn account_error_response(err: AccountError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        AccountError::Validation { kind, message } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(message, kind.code())),
        ),
        AccountError::ConstraintViolation(_) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse::new(
                "An account with this email already exists",
                "EMAIL_ALREADY_EXISTS",
            )),
        ),
        other => {
            error!("Account operation failed: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(
                    "Internal server error while processing account",
                    "DATABASE_ERROR",
                )),
            )
        }
    }
}

/// Health check response
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::users::create_user,
        crate::handlers::users::create_superuser,
        crate::handlers::users::get_users,
        crate::handlers::users::get_user,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::admin::get_change_list,
        crate::handlers::admin::get_admin_config,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            UpdateUserRequest,
            UserResponse,
            ChangeListResponse,
            AdminConfigResponse,
            FieldsetResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "users", description = "Account management endpoints"),
        (name = "admin", description = "Admin change list and configuration"),
    ),
    info(
        title = "Userbase API",
        description = "Email-keyed user accounts with an admin change list",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
