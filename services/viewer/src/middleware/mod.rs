// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

// Request tagging and error responses
pub mod request_context;

pub use request_context::{
    request_context_middleware, ApiError, ReqContext, RequestContext, X_REQUEST_ID,
};
