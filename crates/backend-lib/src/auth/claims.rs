// ============================
// crates/backend-lib/src/auth/claims.rs
// ============================
//! Claim set carried inside access and refresh tokens.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Extra claims attached to a token next to the registered ones
pub type ExtraClaims = Map<String, Value>;

/// Claim names owned by [`Claims`]; an extra claim may not reuse them
pub const RESERVED_CLAIMS: [&str; 5] = ["sub", "iat", "exp", "jti", "typ"];

/// Which flow a token was minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short lived, presented on every protected request
    Access,
    /// Long lived, only exchanged for new access tokens
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access"),
            TokenKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Signed claim set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id. Optional on the wire so a token without it decodes and
    /// is rejected by the verifier rather than the codec.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued-at, unix seconds
    pub iat: i64,
    /// Expires-at, unix seconds
    pub exp: i64,
    /// Unique token id
    #[serde(default)]
    pub jti: String,
    #[serde(rename = "typ")]
    pub kind: TokenKind,
    #[serde(flatten)]
    pub extra: ExtraClaims,
}

impl Claims {
    pub fn issued_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.iat, 0).single().unwrap_or_default()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or_default()
    }

    /// True when `now` is at or past the expiry instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// First extra claim that collides with a registered claim name
    pub fn reserved_key(extra: &ExtraClaims) -> Option<&str> {
        extra
            .keys()
            .map(String::as_str)
            .find(|key| RESERVED_CLAIMS.contains(key))
    }

    /// String-valued extra claim
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}
