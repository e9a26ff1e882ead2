//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod auth;
pub mod decide;
pub mod health;
pub mod s2s;

use actix_web::HttpResponse;

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// Create an error response
    pub fn error(message: String) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            meta: None,
        }
    }

    /// Create an error response with metadata
    pub fn error_with_meta(message: String, meta: serde_json::Value) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message),
            meta: Some(meta),
        }
    }
}

/// Error response helpers
pub mod errors {
    use super::*;
    use crate::utils::error::GatewayError;
    use actix_web::http::StatusCode;

    /// Convert GatewayError to HTTP response
    ///
    /// Token-state errors collapse into one generic message here; which
    /// internal state rejected the token is not for the caller to see.
    pub fn gateway_error_to_response(error: GatewayError) -> HttpResponse {
        let (status, message) = match error {
            GatewayError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            GatewayError::Auth(msg) => (StatusCode::UNAUTHORIZED, msg),
            GatewayError::Token(_) => (StatusCode::UNAUTHORIZED, "Invalid token".to_string()),
            GatewayError::Authorization(msg) => (StatusCode::FORBIDDEN, msg),
            GatewayError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            GatewayError::Validation(msg) | GatewayError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            GatewayError::RateLimit(msg) => (StatusCode::TOO_MANY_REQUESTS, msg),
            GatewayError::PolicyUnavailable(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Policy data unavailable".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        HttpResponse::build(status).json(ApiResponse::<()>::error(message))
    }

    /// Create an unauthorized error response
    pub fn unauthorized_error(message: &str) -> HttpResponse {
        HttpResponse::Unauthorized().json(ApiResponse::<()>::error(message.to_string()))
    }

    /// Create a throttled response carrying the retry hint
    pub fn throttle_error(retry_secs: u64) -> HttpResponse {
        HttpResponse::TooManyRequests()
            .insert_header(("Retry-After", retry_secs.to_string()))
            .json(ApiResponse::<()>::error_with_meta(
                "Too many failed attempts. Try again later.".to_string(),
                serde_json::json!({ "retry_after_secs": retry_secs }),
            ))
    }
}
