// ============================
// crates/backend-lib/src/auth/renewal.rs
// ============================
//! Exchange of refresh tokens for new access tokens.
//!
//! Refresh tokens are neither rotated nor revoked here: the same refresh
//! token can be exchanged any number of times until it expires.

use super::claims::ExtraClaims;
use super::issuer::{Credential, TokenIssuer};
use super::verifier::{AuthFailure, TokenVerifier};

/// Identity claims carried over from the refresh token into the new access token
const CARRIED_CLAIMS: [&str; 2] = ["email", "name"];

#[derive(Debug, Clone)]
pub struct RenewalService {
    verifier: TokenVerifier,
    issuer: TokenIssuer,
}

impl RenewalService {
    pub fn new(verifier: TokenVerifier, issuer: TokenIssuer) -> Self {
        Self { verifier, issuer }
    }

    /// Mint a new access token for the subject of `refresh_token`
    pub fn refresh(&self, refresh_token: &str) -> Result<Credential, AuthFailure> {
        let claims = self.verifier.verify_refresh(refresh_token)?;
        let subject = claims.sub.as_deref().ok_or(AuthFailure::Invalid)?;

        let extra: ExtraClaims = claims
            .extra
            .iter()
            .filter(|(key, _)| CARRIED_CLAIMS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        self.issuer.issue_access(subject, extra, None).map_err(|e| {
            tracing::error!(error = %e, "failed to sign renewed access token");
            AuthFailure::Invalid
        })
    }
}
