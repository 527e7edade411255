// crates/backend-lib/src/handlers/mod.rs

//! HTTP handlers. Guards have already run by the time these are called.

pub mod auth;
pub mod tasks;

/// Liveness check
pub async fn health() -> &'static str {
    "ok"
}
