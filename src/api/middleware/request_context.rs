//! Per-request context extractor

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::api::state::AppState;
use crate::domain::RequestContext;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Builds a [`RequestContext`] carrying the request id, the configured
/// deadline and the server shutdown signal.
impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let request_id = parts
            .headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Ok(RequestContext::new(
            request_id,
            state.request_timeout,
            state.shutdown.clone(),
        ))
    }
}
