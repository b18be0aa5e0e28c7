//! User authentication middleware using JWT tokens

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{DomainError, User};

/// User resolved from the bearer token, stored in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

/// Middleware that resolves the current user from `Authorization: Bearer <jwt>`.
///
/// Requests without the header continue anonymously. A header that is present
/// but malformed, expired, or names an unknown user is rejected with 401.
pub async fn authenticate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let response = match resolve_user(request.headers(), &state).await {
        Ok(user) => {
            if let Some(user) = user {
                request.extensions_mut().insert(AuthenticatedUser(user));
            }
            next.run(request).await
        }
        Err(err) => err.into_response(),
    };

    with_vary_authorization(response)
}

fn with_vary_authorization(mut response: Response) -> Response {
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));
    response
}

async fn resolve_user(headers: &HeaderMap, state: &AppState) -> Result<Option<User>, ApiError> {
    let Some(token) = extract_jwt_token(headers)? else {
        return Ok(None);
    };

    debug!("Validating JWT token");

    let claims = state.jwt_service.validate(&token).map_err(|e| {
        debug!(error = %e, "Rejected authentication token");
        ApiError::invalid_authentication_token()
    })?;

    let user_id = claims
        .user_id()
        .map_err(|_| ApiError::invalid_authentication_token())?;

    match state.user_service.get(user_id).await {
        Ok(user) => Ok(Some(user)),
        Err(DomainError::UserNotFound) => Err(ApiError::invalid_authentication_token()),
        Err(err) => Err(ApiError::server_error(err)),
    }
}

/// Extract JWT token from Authorization header; `None` when the header is absent
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<Option<String>, ApiError> {
    let Some(auth_header) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::invalid_authentication_token())?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(ApiError::invalid_authentication_token()),
    }
}

/// Extractor for the optional current user
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<User>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .map(|authenticated| authenticated.0.clone()),
        ))
    }
}

/// Extractor that requires an authenticated user
#[derive(Debug, Clone)]
pub struct RequireUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Ok(CurrentUser(user)) = CurrentUser::from_request_parts(parts, state).await;

        user.map(RequireUser)
            .ok_or_else(ApiError::authentication_required)
    }
}

/// Extractor that requires an authenticated admin
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl<S: Send + Sync> FromRequestParts<S> for RequireAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(user) = RequireUser::from_request_parts(parts, state).await?;

        if !user.is_admin() {
            return Err(ApiError::not_permitted());
        }

        Ok(RequireAdmin(user))
    }
}
