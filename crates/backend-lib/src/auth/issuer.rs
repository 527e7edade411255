// ============================
// crates/backend-lib/src/auth/issuer.rs
// ============================
//! Minting of access and refresh tokens.

use super::claims::{Claims, ExtraClaims, TokenKind};
use super::codec::{CodecError, TokenCodec};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Lifetime of an access token when the caller does not pick one
pub const DEFAULT_ACCESS_TTL: Duration = Duration::minutes(15);

/// Lifetime of a refresh token when the caller does not pick one
pub const DEFAULT_REFRESH_TTL: Duration = Duration::days(7);

/// A freshly signed token together with the facts that went into it
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: String,
    pub kind: TokenKind,
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Stateless token issuer
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    default_access_ttl: Duration,
    default_refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self::with_ttls(codec, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL)
    }

    pub fn with_ttls(
        codec: Arc<TokenCodec>,
        default_access_ttl: Duration,
        default_refresh_ttl: Duration,
    ) -> Self {
        Self {
            codec,
            default_access_ttl,
            default_refresh_ttl,
        }
    }

    pub fn default_access_ttl(&self) -> Duration {
        self.default_access_ttl
    }

    /// Issue an access token. `ttl` falls back to the issuer's default access lifetime.
    pub fn issue_access(
        &self,
        subject: &str,
        extra: ExtraClaims,
        ttl: Option<Duration>,
    ) -> Result<Credential, CodecError> {
        self.issue(
            TokenKind::Access,
            subject,
            extra,
            ttl.unwrap_or(self.default_access_ttl),
        )
    }

    /// Issue a refresh token. `ttl` falls back to the issuer's default refresh lifetime.
    pub fn issue_refresh(
        &self,
        subject: &str,
        extra: ExtraClaims,
        ttl: Option<Duration>,
    ) -> Result<Credential, CodecError> {
        self.issue(
            TokenKind::Refresh,
            subject,
            extra,
            ttl.unwrap_or(self.default_refresh_ttl),
        )
    }

    fn issue(
        &self,
        kind: TokenKind,
        subject: &str,
        extra: ExtraClaims,
        ttl: Duration,
    ) -> Result<Credential, CodecError> {
        if let Some(key) = Claims::reserved_key(&extra) {
            return Err(CodecError::ReservedClaim(key.to_string()));
        }

        // iat/exp are whole seconds on the wire; keep the credential in step
        let issued_at = self.codec.clock().now().trunc_subsecs(0);
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .ok_or(CodecError::LifetimeOutOfRange)?;
        let claims = Claims {
            sub: Some(subject.to_string()),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
            kind,
            extra,
        };
        let token = self.codec.encode(&claims)?;

        tracing::trace!(%kind, subject, exp = claims.exp, "issued token");

        Ok(Credential {
            token,
            kind,
            subject: subject.to_string(),
            issued_at,
            expires_at,
        })
    }
}
