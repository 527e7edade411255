// ============================
// crates/backend-lib/src/auth/ownership.rs
// ============================
//! Tenant isolation: a caller may only touch resources filed under its own id.

/// True when the verified identity owns the resource addressed by the request
pub fn authorize(credential_identity: &str, request_identity: &str) -> bool {
    credential_identity == request_identity
}
