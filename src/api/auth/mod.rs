//! Authentication token endpoint and the protected probe

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

/// Credentials; the capitalised key spellings are accepted too
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthenticationRequest {
    #[serde(alias = "Email")]
    pub email: String,
    #[serde(alias = "Password")]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthenticationResponse {
    #[serde(rename = "AuthenticationToken")]
    pub token: String,
    #[serde(rename = "AuthenticationTokenExpiry")]
    pub expiry: DateTime<Utc>,
}

/// POST /authentication-tokens
///
/// Exchanges email and password for a signed bearer token.
pub async fn create_authentication_token(
    State(state): State<AppState>,
    Json(request): Json<AuthenticationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;

    let issued = state.jwt_service.generate(&user)?;

    info!(user_id = %user.id(), expiry = %issued.expiry, "Authentication token issued");

    Ok((
        StatusCode::CREATED,
        Json(AuthenticationResponse {
            token: issued.token,
            expiry: issued.expiry,
        }),
    ))
}

/// GET /protected
pub async fn protected(RequireUser(_user): RequireUser) -> &'static str {
    "This is a protected handler"
}
