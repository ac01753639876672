use crate::handlers::users::UserResponse;
use crate::schemas::{account_error_response, ApiResponse, AppState, ErrorResponse};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use axum_valid::Valid;
use chrono::Utc;
use model::admin::{ChangeList, DateJoinedFilter, Fieldset, ModelAdmin, USER_ADMIN};
use model::{AccountError, ValidationKind};
use sea_orm::PaginatorTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace, warn};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Default number of rows per change-list page
const DEFAULT_PER_PAGE: u64 = 100;

/// Query parameters for the admin change list
#[derive(Debug, Default, Deserialize, Serialize, ToSchema, IntoParams, Validate)]
#[into_params(parameter_in = Query)]
pub struct ChangeListQuery {
    /// Search text matched against email, username, first and last name
    pub q: Option<String>,
    pub is_staff: Option<bool>,
    pub is_superuser: Option<bool>,
    pub is_active: Option<bool>,
    /// One of `today`, `past_7_days`, `this_month`, `this_year`
    pub date_joined: Option<String>,
    /// Column from the list display, prefixed with `-` for descending order
    pub o: Option<String>,
    /// Page number (default: 1)
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    /// Page size (default: 100)
    #[validate(range(min = 1, max = 1000))]
    pub per_page: Option<u64>,
}

/// One page of the admin change list
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChangeListResponse {
    pub results: Vec<UserResponse>,
    /// Number of accounts matching the search and filters
    pub count: u64,
    pub page: u64,
    pub per_page: u64,
    pub num_pages: u64,
}

/// A named group of fields on an admin form
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldsetResponse {
    pub name: Option<String>,
    pub classes: Vec<String>,
    pub fields: Vec<String>,
}

impl From<&Fieldset> for FieldsetResponse {
    fn from(fieldset: &Fieldset) -> Self {
        Self {
            name: fieldset.name.map(str::to_string),
            classes: to_strings(fieldset.classes),
            fields: to_strings(fieldset.fields),
        }
    }
}

/// Declarative admin configuration for accounts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminConfigResponse {
    pub list_display: Vec<String>,
    pub list_filter: Vec<String>,
    pub search_fields: Vec<String>,
    pub ordering: Vec<String>,
    pub fieldsets: Vec<FieldsetResponse>,
    pub add_fieldsets: Vec<FieldsetResponse>,
}

impl From<&ModelAdmin> for AdminConfigResponse {
    fn from(admin: &ModelAdmin) -> Self {
        Self {
            list_display: to_strings(admin.list_display),
            list_filter: to_strings(admin.list_filter),
            search_fields: to_strings(admin.search_fields),
            ordering: to_strings(admin.ordering),
            fieldsets: admin.fieldsets.iter().map(FieldsetResponse::from).collect(),
            add_fieldsets: admin.add_fieldsets.iter().map(FieldsetResponse::from).collect(),
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl TryFrom<&ChangeListQuery> for ChangeList {
    type Error = AccountError;

    fn try_from(query: &ChangeListQuery) -> Result<Self, Self::Error> {
        let date_joined = query
            .date_joined
            .as_deref()
            .map(str::parse::<DateJoinedFilter>)
            .transpose()
            .map_err(|message| {
                AccountError::validation(ValidationKind::InvalidFilter, message)
            })?;

        Ok(ChangeList {
            search: query.q.clone(),
            is_staff: query.is_staff,
            is_superuser: query.is_superuser,
            is_active: query.is_active,
            date_joined,
            ordering: query.o.clone(),
        })
    }
}

/// List accounts the way the admin change list shows them
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    tag = "admin",
    params(ChangeListQuery),
    responses(
        (status = 200, description = "Change list retrieved successfully", body = ApiResponse<ChangeListResponse>),
        (status = 400, description = "Invalid filter or ordering", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_change_list(
    Valid(Query(query)): Valid<Query<ChangeListQuery>>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ChangeListResponse>>, (StatusCode, Json<ErrorResponse>)> {
    trace!("Entering get_change_list function");

    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);
    debug!("Fetching change list - page: {}, per_page: {}", page, per_page);

    let select = ChangeList::try_from(&query)
        .and_then(|change_list| change_list.select(&USER_ADMIN, Utc::now()))
        .map_err(|account_error| {
            warn!("Rejected change list request: {}", account_error);
            account_error_response(account_error)
        })?;

    let paginator = select.paginate(&state.db, per_page);
    let counts = paginator
        .num_items_and_pages()
        .await
        .map_err(|db_error| account_error_response(db_error.into()))?;
    let users = paginator
        .fetch_page(page - 1)
        .await
        .map_err(|db_error| account_error_response(db_error.into()))?;

    info!("Change list page {} returned {} of {} accounts",
          page, users.len(), counts.number_of_items);
    let response = ApiResponse {
        data: ChangeListResponse {
            results: users.into_iter().map(UserResponse::from).collect(),
            count: counts.number_of_items,
            page,
            per_page,
            num_pages: counts.number_of_pages,
        },
        message: "Change list retrieved successfully".to_string(),
        success: true,
    };
    Ok(Json(response))
}

/// Get the declarative admin configuration for accounts
#[utoipa::path(
    get,
    path = "/api/v1/admin/users/config",
    tag = "admin",
    responses(
        (status = 200, description = "Admin configuration", body = ApiResponse<AdminConfigResponse>)
    )
)]
#[instrument]
pub async fn get_admin_config() -> Json<ApiResponse<AdminConfigResponse>> {
    Json(ApiResponse {
        data: AdminConfigResponse::from(&USER_ADMIN),
        message: "Admin configuration retrieved successfully".to_string(),
        success: true,
    })
}
