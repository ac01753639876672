use crate::schemas::{account_error_response, ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use model::entities::user;
use model::identity::{normalize_email, validate_display_name, validate_email, validate_username};
use model::password::make_password;
use model::{AccountError, ExtraFields, UserManager, ValidationKind};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, trace, warn};
use utoipa::ToSchema;

/// Request body for creating a new account
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    /// Email address used to log in (required, unique after normalization)
    #[serde(default)]
    pub email: String,
    /// Raw password; omit to create an account without a usable password
    pub password: Option<String>,
    /// Optional display handle (letters, digits and @/./+/-/_ only)
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Whether the account may log in (default: true)
    pub is_active: Option<bool>,
    /// Whether the account may use the admin (default: false)
    pub is_staff: Option<bool>,
    /// Whether the account has every permission (default: false)
    pub is_superuser: Option<bool>,
}

impl CreateUserRequest {
    fn extra_fields(&self) -> ExtraFields {
        ExtraFields {
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
        }
    }
}

/// Request body for updating an account
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// New email address (normalized before storage)
    pub email: Option<String>,
    /// New raw password
    pub password: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
}

/// Account response model; the password hash is never exposed
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub email: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub has_usable_password: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name(),
            has_usable_password: model.has_usable_password(),
            email: model.email,
            username: model.username,
            first_name: model.first_name,
            last_name: model.last_name,
            is_active: model.is_active,
            is_staff: model.is_staff,
            is_superuser: model.is_superuser,
            last_login: model.last_login,
            date_joined: model.date_joined,
        }
    }
}

/// Create a new account
#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_user function");
    debug!("Creating user with email: {}", request.email);

    let manager = UserManager::new(&state.db);
    match manager
        .create_user(&request.email, request.password.as_deref(), request.extra_fields())
        .await
    {
        Ok(user_model) => {
            info!("User created successfully with ID: {}, email: {}",
                  user_model.id, user_model.email);
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(account_error) => {
            warn!("Failed to create user '{}': {}", request.email, account_error);
            Err(account_error_response(account_error))
        }
    }
}

/// Create a new elevated (staff and superuser) account
#[utoipa::path(
    post,
    path = "/api/v1/users/superuser",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Superuser created successfully", body = ApiResponse<UserResponse>),
        (status = 400, description = "Invalid request or elevation flags set to false", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn create_superuser(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering create_superuser function");
    debug!("Creating superuser with email: {}", request.email);

    let manager = UserManager::new(&state.db);
    match manager
        .create_superuser(&request.email, request.password.as_deref(), request.extra_fields())
        .await
    {
        Ok(user_model) => {
            info!("Superuser created successfully with ID: {}, email: {}",
                  user_model.id, user_model.email);
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "Superuser created successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(account_error) => {
            warn!("Failed to create superuser '{}': {}", request.email, account_error);
            Err(account_error_response(account_error))
        }
    }
}

/// Get all users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "users",
    responses(
        (status = 200, description = "Users retrieved successfully", body = ApiResponse<Vec<UserResponse>>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, StatusCode> {
    trace!("Entering get_users function");
    debug!("Fetching all users from database");

    match user::Entity::find()
        .order_by_asc(user::Column::Email)
        .all(&state.db)
        .await
    {
        Ok(users) => {
            let user_count = users.len();
            debug!("Retrieved {} users from database", user_count);

            let user_responses: Vec<UserResponse> = users
                .into_iter()
                .map(UserResponse::from)
                .collect();

            info!("Successfully retrieved {} users", user_count);
            let response = ApiResponse {
                data: user_responses,
                message: "Users retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            error!("Failed to retrieve users from database: {}", db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a specific user by ID
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UserResponse>>, StatusCode> {
    trace!("Entering get_user function for user_id: {}", user_id);

    match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user_model)) => {
            info!("Successfully retrieved user with ID: {}, email: {}",
                  user_model.id, user_model.email);
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User retrieved successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Ok(None) => {
            warn!("User with ID {} not found", user_id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(db_error) => {
            error!("Failed to retrieve user with ID {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Apply the provided fields of an update request to an active model.
///
/// Runs the same normalization and field rules as account creation.
fn apply_update(
    user_active: &mut user::ActiveModel,
    request: UpdateUserRequest,
) -> Result<Vec<&'static str>, AccountError> {
    let mut updated_fields = Vec::new();

    if let Some(email) = request.email {
        if email.trim().is_empty() {
            return Err(AccountError::validation(
                ValidationKind::MissingRequiredField,
                "The Email field must be set",
            ));
        }
        let email = normalize_email(&email);
        validate_email(&email)?;
        user_active.email = Set(email);
        updated_fields.push("email");
    }
    if let Some(username) = request.username {
        let username = username.trim().to_string();
        if username.is_empty() {
            user_active.username = Set(None);
        } else {
            validate_username(&username)?;
            user_active.username = Set(Some(username));
        }
        updated_fields.push("username");
    }
    if let Some(first_name) = request.first_name {
        validate_display_name("first_name", &first_name)?;
        user_active.first_name = Set(first_name);
        updated_fields.push("first_name");
    }
    if let Some(last_name) = request.last_name {
        validate_display_name("last_name", &last_name)?;
        user_active.last_name = Set(last_name);
        updated_fields.push("last_name");
    }
    if let Some(password) = request.password {
        user_active.password = Set(make_password(Some(password.as_str()))?);
        updated_fields.push("password");
    }
    if let Some(is_active) = request.is_active {
        user_active.is_active = Set(is_active);
        updated_fields.push("is_active");
    }
    if let Some(is_staff) = request.is_staff {
        user_active.is_staff = Set(is_staff);
        updated_fields.push("is_staff");
    }
    if let Some(is_superuser) = request.is_superuser {
        user_active.is_superuser = Set(is_superuser);
        updated_fields.push("is_superuser");
    }

    Ok(updated_fields)
}

/// Update a user
#[utoipa::path(
    put,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated successfully", body = ApiResponse<UserResponse>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, request))]
pub async fn update_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering update_user function for user_id: {}", user_id);

    trace!("Looking up existing user with ID: {}", user_id);
    let existing_user = match user::Entity::find_by_id(user_id).one(&state.db).await {
        Ok(Some(user)) => {
            debug!("Found existing user: {}", user.email);
            user
        }
        Ok(None) => {
            warn!("User with ID {} not found for update", user_id);
            return Err((
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new(
                    format!("User with ID {} not found", user_id),
                    "USER_NOT_FOUND",
                )),
            ));
        }
        Err(db_error) => {
            error!("Failed to lookup user with ID {} for update: {}", user_id, db_error);
            return Err(account_error_response(db_error.into()));
        }
    };

    let mut user_active: user::ActiveModel = existing_user.into();
    let updated_fields = apply_update(&mut user_active, request).map_err(|account_error| {
        warn!("Rejected update for user ID {}: {}", user_id, account_error);
        account_error_response(account_error)
    })?;

    if updated_fields.is_empty() {
        debug!("No fields to update for user ID: {}", user_id);
    } else {
        debug!("Updating fields: {}", updated_fields.join(", "));
    }

    trace!("Attempting to update user in database");
    match user_active.update(&state.db).await {
        Ok(updated_user) => {
            info!("User with ID {} updated successfully. Updated fields: {}",
                  user_id, if updated_fields.is_empty() { "none".to_string() } else { updated_fields.join(", ") });
            let response = ApiResponse {
                data: UserResponse::from(updated_user),
                message: "User updated successfully".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(db_error) => {
            let account_error = AccountError::from(db_error);
            warn!("Failed to update user with ID {}: {}", user_id, account_error);
            Err(account_error_response(account_error))
        }
    }
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    tag = "users",
    params(
        ("user_id" = i32, Path, description = "User ID"),
    ),
    responses(
        (status = 200, description = "User deleted successfully", body = ApiResponse<String>),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_user(
    Path(user_id): Path<i32>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<String>>, StatusCode> {
    trace!("Entering delete_user function for user_id: {}", user_id);
    debug!("Attempting to delete user with ID: {}", user_id);

    match user::Entity::delete_by_id(user_id).exec(&state.db).await {
        Ok(delete_result) => {
            debug!("Delete operation completed. Rows affected: {}", delete_result.rows_affected);
            if delete_result.rows_affected > 0 {
                info!("User with ID {} deleted successfully", user_id);
                let response = ApiResponse {
                    data: format!("User {} deleted", user_id),
                    message: "User deleted successfully".to_string(),
                    success: true,
                };
                Ok(Json(response))
            } else {
                warn!("User with ID {} not found for deletion (no rows affected)", user_id);
                Err(StatusCode::NOT_FOUND)
            }
        }
        Err(db_error) => {
            error!("Failed to delete user with ID {}: {}", user_id, db_error);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
