//! Caller identity from request headers.
//!
//! Authentication happens upstream; the gateway forwards who the caller is in
//! `x-user-id`, `x-user-role` and `x-tenant-id`.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::error::AppError;
use crate::models::{ActorContext, Role};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const ROLE_HEADER: &str = "x-user-role";
pub const TENANT_HEADER: &str = "x-tenant-id";

/// Extractor yielding the caller's [`ActorContext`].
#[derive(Debug, Clone)]
pub struct Actor(pub ActorContext);

fn header<'a>(parts: &'a Parts, name: &str) -> Result<&'a str, AppError> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", name)))?;
    let value = value
        .to_str()
        .map_err(|_| AppError::BadRequest(format!("Header {} is not valid text", name)))?
        .trim();
    if value.is_empty() {
        return Err(AppError::Unauthorized(format!("Empty {} header", name)));
    }
    Ok(value)
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)?;
        let role: Role = header(parts, ROLE_HEADER)?
            .parse()
            .map_err(AppError::BadRequest)?;
        let tenant = header(parts, TENANT_HEADER)?;

        Ok(Actor(ActorContext::new(user_id, role, tenant)))
    }
}
