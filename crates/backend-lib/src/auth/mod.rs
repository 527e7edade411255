// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication and authorization core.
//!
//! Per inbound request the order is: rate gate, token verification,
//! ownership check. Issuance and renewal only run on the `/auth/*` entry points.
pub mod claims;
pub mod codec;
pub mod issuer;
pub mod ownership;
pub mod password;
pub mod rate_limit;
pub mod renewal;
mod service;
mod service_impl;
pub mod verifier;

pub use claims::{Claims, ExtraClaims, TokenKind};
pub use codec::{CodecError, SigningSecret, TokenCodec};
pub use issuer::{Credential, TokenIssuer, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL};
pub use ownership::authorize;
pub use password::{
    hash_password, validate_password_strength, verify_password, PasswordRequirements,
    MIN_PASSWORD_LENGTH,
};
pub use rate_limit::{RateDecision, RateGate};
pub use renewal::RenewalService;
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use verifier::{AuthFailure, AuthenticatedUser, TokenVerifier};
