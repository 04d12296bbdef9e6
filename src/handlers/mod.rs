// Handlers module
// HTTP handlers for the REST API

pub mod todos;

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

use crate::error::ApiError;

pub const SERVICE_NAME: &str = "Todo Management API";
pub const API_VERSION: &str = "1.0";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
}

/// Health check handler
/// GET /api/
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: "success",
            message: format!("{} is running", SERVICE_NAME),
            version: Some(API_VERSION),
        }),
    )
}

/// Greeting handler
/// GET /api/helloworld/
pub async fn hello_world() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(StatusResponse {
            status: "success",
            message: "Hello, World!".to_string(),
            version: None,
        }),
    )
}

/// Fallback for requests that match no route.
pub async fn route_not_found() -> ApiError {
    ApiError::RouteNotFound
}

/// Fallback for a known path hit with a method it does not serve.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
