// ============================
// crates/backend-lib/src/auth/verifier.rs
// ============================
//! Verification of presented tokens.
//!
//! Every codec failure is folded into an [`AuthFailure`]. The reason is only
//! ever logged; callers turn any failure into the same 401 response.

use super::claims::{Claims, TokenKind};
use super::codec::{CodecError, TokenCodec};
use std::fmt;
use std::sync::Arc;

/// Why a request could not be authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No bearer token was presented
    MissingToken,
    /// Signature valid but the token is past its expiry
    Expired,
    /// Malformed, forged, or missing a subject
    Invalid,
    /// A refresh token where an access token was required, or vice versa
    WrongTokenType,
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            AuthFailure::MissingToken => "missing token",
            AuthFailure::Expired => "expired",
            AuthFailure::Invalid => "invalid",
            AuthFailure::WrongTokenType => "wrong token type",
        };
        f.write_str(reason)
    }
}

impl From<CodecError> for AuthFailure {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::Expired => AuthFailure::Expired,
            CodecError::Malformed
            | CodecError::SignatureInvalid
            | CodecError::Encode(_)
            | CodecError::ReservedClaim(_)
            | CodecError::LifetimeOutOfRange => AuthFailure::Invalid,
        }
    }
}

/// Identity established from a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl AuthenticatedUser {
    fn from_claims(claims: &Claims) -> Result<Self, AuthFailure> {
        let user_id = subject_of(claims)?;
        Ok(Self {
            user_id,
            email: claims.extra_str("email").map(str::to_string),
            name: claims.extra_str("name").map(str::to_string),
        })
    }
}

fn subject_of(claims: &Claims) -> Result<String, AuthFailure> {
    match claims.sub.as_deref() {
        Some(sub) if !sub.is_empty() => Ok(sub.to_string()),
        _ => Err(AuthFailure::Invalid),
    }
}

#[derive(Debug, Clone)]
pub struct TokenVerifier {
    codec: Arc<TokenCodec>,
}

impl TokenVerifier {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }

    /// Verify an access token and return the identity it carries
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthFailure> {
        let claims = self.verify_claims(token, TokenKind::Access)?;
        AuthenticatedUser::from_claims(&claims)
    }

    /// Verify an access token, returning only its subject
    pub fn verify_subject(&self, token: &str) -> Result<String, AuthFailure> {
        let claims = self.verify_claims(token, TokenKind::Access)?;
        subject_of(&claims)
    }

    /// Verify a refresh token and return its full claim set
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthFailure> {
        let claims = self.verify_claims(token, TokenKind::Refresh)?;
        subject_of(&claims)?;
        Ok(claims)
    }

    fn verify_claims(&self, token: &str, expected: TokenKind) -> Result<Claims, AuthFailure> {
        let claims = self.codec.decode(token)?;
        if claims.kind != expected {
            return Err(AuthFailure::WrongTokenType);
        }
        Ok(claims)
    }
}
