// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const AUTH_REGISTERED: &str = "auth.registered";
pub const AUTH_REGISTER_CONFLICT: &str = "auth.register_conflict";
pub const AUTH_LOGIN_SUCCEEDED: &str = "auth.login_succeeded";
pub const AUTH_LOGIN_FAILED: &str = "auth.login_failed";
pub const AUTH_REFRESHED: &str = "auth.refreshed";
pub const AUTH_REJECTED: &str = "auth.rejected";
pub const OWNERSHIP_DENIED: &str = "ownership.denied";
pub const RATE_LIMITED: &str = "rate_limit.denied";
