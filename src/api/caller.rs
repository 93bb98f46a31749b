//! Caller identity as handed over by the authentication layer.
//!
//! The auth proxy in front of this service sets `x-caller-id` for signed-in
//! users and `x-caller-role: moderator` for moderators. Anything else is an
//! anonymous, non-privileged caller.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use std::convert::Infallible;

use crate::domain::{Caller, EntityId};

pub const CALLER_ID_HEADER: &str = "x-caller-id";
pub const CALLER_ROLE_HEADER: &str = "x-caller-role";

pub fn caller_from_headers(headers: &HeaderMap) -> Caller {
    let id = headers
        .get(CALLER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(EntityId::new);

    let is_moderator = headers
        .get(CALLER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|role| role.trim().eq_ignore_ascii_case("moderator"))
        .unwrap_or(false);

    Caller { id, is_moderator }
}

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(caller_from_headers(&parts.headers))
    }
}
