//! HTTP error responses

use std::collections::BTreeMap;
use std::fmt::Display;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::domain::{DomainError, Validator};

pub const NOT_FOUND_MESSAGE: &str = "The requested resource could not be found";
pub const SERVER_ERROR_MESSAGE: &str =
    "The server encountered a problem and could not process your request";
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid authentication token";
pub const AUTHENTICATION_REQUIRED_MESSAGE: &str =
    "You must be authenticated to access this resource";
pub const NOT_PERMITTED_MESSAGE: &str =
    "Your user account doesn't have the necessary permissions to access this resource";

/// Error body: either a single message or a field error map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ApiErrorResponse {
    #[serde(rename = "Error")]
    Message(String),
    #[serde(rename = "FieldErrors")]
    FieldErrors(BTreeMap<String, String>),
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
    www_authenticate: bool,
}

impl ApiError {
    /// Create a new API error with a message body
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse::Message(message.into()),
            www_authenticate: false,
        }
    }

    /// Malformed request
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Field errors collected by a validator
    pub fn failed_validation(v: Validator) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            response: ApiErrorResponse::FieldErrors(v.field_errors().clone()),
            www_authenticate: false,
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
    }

    pub fn method_not_allowed(method: &Method) -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            format!("The {} method is not supported for this resource", method),
        )
    }

    /// Bad or expired bearer token
    pub fn invalid_authentication_token() -> Self {
        Self {
            www_authenticate: true,
            ..Self::new(StatusCode::UNAUTHORIZED, INVALID_TOKEN_MESSAGE)
        }
    }

    pub fn authentication_required() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, AUTHENTICATION_REQUIRED_MESSAGE)
    }

    pub fn not_permitted() -> Self {
        Self::new(StatusCode::FORBIDDEN, NOT_PERMITTED_MESSAGE)
    }

    /// Unexpected failure: the detail goes to the log, the client gets a generic message
    pub fn server_error(err: impl Display) -> Self {
        error!(error = %err, "Request failed with server error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.response)).into_response();

        if self.www_authenticate {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        if err.is_expected() {
            debug!(error = %err, "Rejecting request");
        }

        match err {
            DomainError::FailedValidation(v) => Self::failed_validation(v),
            DomainError::UserNotFound => Self::not_found(),
            DomainError::UserExists => {
                let mut v = Validator::new();
                v.add_field_error("email", "Email is already in use");
                Self::failed_validation(v)
            }
            err @ (DomainError::Storage { .. }
            | DomainError::Internal { .. }
            | DomainError::Configuration { .. }) => Self::server_error(err),
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.response {
            ApiErrorResponse::Message(message) => write!(f, "{}: {}", self.status, message),
            ApiErrorResponse::FieldErrors(errors) => {
                write!(f, "{}: {} field error(s)", self.status, errors.len())
            }
        }
    }
}

impl std::error::Error for ApiError {}
