// crates/backend-lib/src/middleware/rate_limit.rs

//! Rate-limit stage.
use crate::auth::{RateDecision, RateGate};
use crate::{error::AppError, metrics};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

/// Rate limiter middleware
pub async fn rate_limit(
    State(gate): State<Arc<RateGate>>,
    request: Request,
    next: Next,
) -> Response {
    let key = requester_key(&request);

    match gate.check(&key) {
        RateDecision::Allowed { .. } => next.run(request).await,
        RateDecision::Limited { retry_after } => {
            ::metrics::counter!(metrics::RATE_LIMITED).increment(1);
            tracing::warn!(
                requester = %key,
                path = %request.uri().path(),
                "rate limit exceeded"
            );

            // round up so clients never retry inside the window
            let retry_secs = ((retry_after.num_milliseconds() + 999) / 1000).max(1) as u64;
            let mut response = AppError::RateLimitExceeded.into_response();
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_secs));
            response
        },
    }
}

/// Identify the caller: proxy headers first, then the peer address
pub fn requester_key<B>(request: &axum::http::Request<B>) -> String {
    let headers = request.headers();

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = real_ip {
        return ip.to_string();
    }

    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    if let Some(ConnectInfo(addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip().to_string();
    }

    "unknown".to_string()
}
