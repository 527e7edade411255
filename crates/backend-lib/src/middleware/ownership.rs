// crates/backend-lib/src/middleware/ownership.rs

//! Ownership stage. Must run after the authenticate stage.
use crate::auth::{authorize, AuthFailure, AuthenticatedUser};
use crate::{error::AppError, metrics};
use axum::{
    extract::{Path, Request},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

/// Path parameter naming the owner of the addressed resource
pub const OWNER_PARAM: &str = "user_id";

/// Deny the request unless the `{user_id}` path segment is the caller's own id
pub async fn enforce_ownership(
    Path(params): Path<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(user) = request.extensions().get::<AuthenticatedUser>() else {
        return Err(AppError::Unauthenticated(AuthFailure::MissingToken));
    };
    let Some(owner) = params.get(OWNER_PARAM) else {
        tracing::error!(
            path = %request.uri().path(),
            "ownership guard on a route without {{user_id}}"
        );
        return Err(AppError::Forbidden);
    };

    if !authorize(&user.user_id, owner) {
        ::metrics::counter!(metrics::OWNERSHIP_DENIED).increment(1);
        tracing::warn!(
            user_id = %user.user_id,
            method = %request.method(),
            path = %request.uri().path(),
            "cross-tenant access denied"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
