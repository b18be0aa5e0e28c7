//! User endpoints
//!
//! Registration and listing are open; password changes need the account owner
//! or an admin, and admin-flag changes and deletes need an admin.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::api::middleware::{RequireAdmin, RequireUser};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::User;
use crate::infrastructure::user::{CreateUserRequest, ListUsersRequest};

/// Single-resource envelope
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    #[serde(rename = "Data")]
    pub data: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateUserBody {
    pub email: String,
    pub password: String,
    pub admin: bool,
}

/// Paging parameters taken from the query string
///
/// A repeated key keeps its first value; everything else is left to the validator.
#[derive(Debug, Default)]
pub struct ListUsersQuery {
    pub page_number: Option<String>,
    pub page_size: Option<String>,
}

impl ListUsersQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();

        for (key, value) in pairs {
            let slot = match key.as_str() {
                "pageNumber" => &mut query.page_number,
                "pageSize" => &mut query.page_size,
                _ => continue,
            };

            if slot.is_none() {
                *slot = Some(value);
            }
        }

        query
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdatePasswordBody {
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateAdminBody {
    pub admin: bool,
}

/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_service
        .create(CreateUserRequest {
            email: body.email,
            password: body.password,
            admin: body.admin,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /users?pageNumber=N&pageSize=M
pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let query = ListUsersQuery::from_pairs(pairs);

    let list = state
        .user_service
        .list(ListUsersRequest {
            page_number: query.page_number,
            page_size: query.page_size,
        })
        .await?;

    Ok(Json(list))
}

/// GET /users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DataResponse<User>>, ApiError> {
    let id = parse_id(id)?;
    let user = state.user_service.get(id).await?;

    Ok(Json(DataResponse { data: user }))
}

/// PUT /users/{id}/password
pub async fn update_password(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    RequireUser(current): RequireUser,
    Json(body): Json<UpdatePasswordBody>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(id)?;

    if current.id() != id && !current.is_admin() {
        debug!(user_id = %current.id(), target = %id, "Password change refused");
        return Err(ApiError::not_permitted());
    }

    state.user_service.update_password(id, body.password).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// PUT /users/{id}/admin
pub async fn update_admin(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    _admin: RequireAdmin,
    Json(body): Json<UpdateAdminBody>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(id)?;
    state.user_service.update_admin(id, body.admin).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    _admin: RequireAdmin,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(id)?;
    state.user_service.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// An unparseable ID cannot name an existing user
fn parse_id(id: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    id.map(|Path(id)| id).map_err(|_| ApiError::not_found())
}
