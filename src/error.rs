use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::metrics::STORE_ERRORS;
use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("key-value store is not configured")]
    KvNotConfigured,

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("rate limited")]
    RateLimited,

    #[error("username is required")]
    UsernameRequired,

    #[error("username is too long")]
    UsernameTooLong,

    #[error("invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::KvNotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UsernameRequired | ApiError::UsernameTooLong => StatusCode::BAD_REQUEST,
            ApiError::InvalidBody(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Error code sent to the client, no internal detail
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::KvNotConfigured => "kv_not_configured",
            ApiError::MethodNotAllowed => "method_not_allowed",
            ApiError::RateLimited => "rate_limited",
            ApiError::UsernameRequired => "username_required",
            ApiError::UsernameTooLong => "username_too_long",
            ApiError::InvalidBody(_) | ApiError::Store(_) => "server_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Store(_) => {
                STORE_ERRORS.inc();
                error!(error = %self, "supporters request failed");
            }
            ApiError::InvalidBody(_) => error!(error = %self, "supporters request failed"),
            _ => {}
        }

        let mut response = json_response(self.status(), Json(json!({ "error": self.code() })));
        if let ApiError::MethodNotAllowed = self {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("GET, POST"));
        }
        response
    }
}

/// JSON response that is never cached.
pub fn json_response(status: StatusCode, body: impl IntoResponse) -> Response {
    let mut response = (status, body).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
