//! `Requester` extractor: builds the request context from gateway headers.
//!
//! Deskbook sits behind a gateway that authenticates callers and forwards
//! their identity in `x-user-id` and `x-user-role`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use deskbook_core::error::AppError;
use deskbook_core::types::UserId;
use deskbook_entity::user::UserRole;
use deskbook_service::context::RequestContext;

use crate::error::ApiError;

/// Header carrying the acting user's UUID.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the acting user's role (`client` when absent).
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Extracted requester context available in handlers.
#[derive(Debug, Clone)]
pub struct Requester(pub RequestContext);

impl std::ops::Deref for Requester {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Requester
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::permission_denied("Missing x-user-id header"))?;

        let user_id: UserId = raw_id
            .trim()
            .parse()
            .map_err(|_| AppError::invalid_argument(format!("Invalid x-user-id: {raw_id}")))?;

        let role = match parts.headers.get(USER_ROLE_HEADER) {
            Some(value) => value
                .to_str()
                .map_err(|_| AppError::invalid_argument("Invalid x-user-role header"))?
                .trim()
                .parse::<UserRole>()?,
            None => UserRole::Client,
        };

        Ok(Requester(RequestContext::new(user_id, role)))
    }
}
