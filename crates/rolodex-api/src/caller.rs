//! Caller identity extraction.
//!
//! The identity provider in front of this API asserts the authenticated
//! user's opaque id in a request header. The API never mints or verifies
//! ids itself; it only refuses requests that arrive without one.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Header carrying the authenticated user's opaque id.
pub const CALLER_HEADER: &str = "x-user-id";

/// The caller's owner id, threaded into every store operation.
#[derive(Debug, Clone)]
pub struct CallerId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerId {
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    _state: &S,
  ) -> Result<Self, Self::Rejection> {
    parts
      .headers
      .get(CALLER_HEADER)
      .and_then(|v| v.to_str().ok())
      .map(str::trim)
      .filter(|v| !v.is_empty())
      .map(|v| CallerId(v.to_owned()))
      .ok_or(ApiError::Unauthenticated)
  }
}
