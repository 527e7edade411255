// crates/backend-lib/src/middleware/authenticate.rs

//! Bearer-token stage.
use crate::auth::{AuthFailure, AuthenticatedUser, TokenVerifier};
use crate::{error::AppError, metrics};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Verify the bearer token and attach the caller's identity to the request
pub async fn authenticate(
    State(verifier): State<Arc<TokenVerifier>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let verified = bearer_token(request.headers())
        .ok_or(AuthFailure::MissingToken)
        .and_then(|token| verifier.verify(token));

    let user = match verified {
        Ok(user) => user,
        Err(failure) => {
            ::metrics::counter!(metrics::AUTH_REJECTED).increment(1);
            tracing::debug!(
                reason = %failure,
                path = %request.uri().path(),
                "rejected unauthenticated request"
            );
            return Err(AppError::Unauthenticated(failure));
        },
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated(AuthFailure::MissingToken))
    }
}
