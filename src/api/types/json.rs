//! Custom JSON extractor with client-facing decode errors

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json as AxumJson,
};
use serde::de::DeserializeOwned;
use serde_json::error::Category;

use super::error::ApiError;

/// Upper bound on request bodies, enforced by `DefaultBodyLimit` in the router
pub const MAX_BODY_BYTES: usize = 1_048_576;

/// JSON extractor that reads the body regardless of `Content-Type` and turns
/// every decode failure into a 400 `{"Error": ...}` response.
///
/// Exactly one JSON value is accepted. Request types should use
/// `deny_unknown_fields` so stray keys are reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Consume the extractor and return the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<S, T> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::bad_request(format!(
                    "Body must not be larger than {} bytes",
                    MAX_BODY_BYTES
                ))
            } else {
                ApiError::bad_request("Body contains badly-formed JSON")
            }
        })?;

        decode(&body).map(Json)
    }
}

/// Decode exactly one JSON value from `body`
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::bad_request("Body must not be empty"));
    }

    let mut de = serde_json::Deserializer::from_slice(body);

    let value = T::deserialize(&mut de).map_err(|err| ApiError::bad_request(describe(&err)))?;

    de.end()
        .map_err(|_| ApiError::bad_request("Body must only contain a single JSON value"))?;

    Ok(value)
}

fn describe(err: &serde_json::Error) -> String {
    match err.classify() {
        Category::Data => {
            let message = err.to_string();

            if let Some(key) = quoted_field(&message, "unknown field `") {
                format!("Body contains unknown key \"{}\"", key)
            } else if let Some(key) = quoted_field(&message, "duplicate field `") {
                format!("Body contains duplicate key \"{}\"", key)
            } else {
                "Body contains incorrect JSON type".to_string()
            }
        }
        Category::Syntax | Category::Eof | Category::Io => {
            "Body contains badly-formed JSON".to_string()
        }
    }
}

/// serde names keys as "unknown field `name`, expected ..." or "duplicate field `name`"
fn quoted_field<'a>(message: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = message.strip_prefix(prefix)?;
    let end = rest.find('`')?;

    Some(&rest[..end])
}

impl<T> IntoResponse for Json<T>
where
    T: serde::Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl<T> From<T> for Json<T> {
    fn from(value: T) -> Self {
        Json(value)
    }
}
