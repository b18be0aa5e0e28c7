//! Liveness probe

use axum::{http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    #[serde(rename = "Status")]
    pub status: &'static str,
}

/// GET /status
///
/// Always answers while the process is serving requests.
pub async fn status() -> impl IntoResponse {
    (StatusCode::OK, Json(StatusResponse { status: "OK" }))
}
