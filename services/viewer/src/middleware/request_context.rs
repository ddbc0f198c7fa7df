// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! Request context middleware for the viewer.
//!
//! Tags every request with an id taken from the `x-request-id` header (or a
//! fresh UUID when absent), runs the handler inside a span carrying that id,
//! and echoes the id on the response. Handlers read the context through the
//! [`ReqContext`] extractor.

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use benchscope_core::Error;
use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// Header carrying the request id.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Per-request metadata stored in the request extensions.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Caller-supplied or generated request id.
    pub request_id: String,
    /// When the middleware saw the request.
    pub received_at: DateTime<Utc>,
}

/// Error response of the viewer API.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Stable error code, e.g. `FETCH_FAILED`.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl ApiError {
    /// Build an error response.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::Fetch { .. } => StatusCode::BAD_GATEWAY,
            Error::Parse { .. } | Error::Shape(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::UnknownIteration { .. } => StatusCode::NOT_FOUND,
            Error::NoSuiteSelected | Error::ListingPending { .. } => StatusCode::CONFLICT,
            Error::InvalidEntry { .. } => StatusCode::BAD_REQUEST,
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "code": self.code,
                "message": self.message,
            },
            "meta": {
                "timestamp": Utc::now().to_rfc3339(),
            }
        }));
        (self.status, body).into_response()
    }
}

/// Middleware attaching a [`RequestContext`] and echoing `x-request-id`.
pub async fn request_context_middleware(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    req.extensions_mut().insert(RequestContext {
        request_id: request_id.clone(),
        received_at: Utc::now(),
    });

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}

/// Extractor for the [`RequestContext`] set by the middleware.
///
/// ```ignore
/// async fn handler(ReqContext(ctx): ReqContext) -> String {
///     ctx.request_id
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ReqContext(pub RequestContext);

impl std::ops::Deref for ReqContext {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for ReqContext
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(ReqContext)
            .ok_or(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "MISSING_REQUEST_CONTEXT",
                "request context middleware is not installed",
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchscope_core::ShapeError;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (Error::fetch("u", "status 500"), StatusCode::BAD_GATEWAY),
            (Error::parse("u", "bad json"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                Error::Shape(ShapeError::MissingField {
                    record: "r".to_string(),
                    field: "items_per_second",
                }),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                Error::UnknownIteration {
                    suite: "ssb/".to_string(),
                    iteration: "x.json".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                Error::ListingPending {
                    suite: "ssb/".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                Error::InvalidEntry {
                    name: "../private/".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, status) in cases {
            let code = err.code();
            let api = ApiError::from(err);
            assert_eq!(api.status, status);
            assert_eq!(api.code, code);
        }
    }
}
