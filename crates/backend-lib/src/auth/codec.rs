// ============================
// crates/backend-lib/src/auth/codec.rs
// ============================
//! Signing and verification of claim sets.
//!
//! Tokens are compact HS256 JWS strings. The codec owns the process-wide
//! symmetric secret; it is handed in at construction time so it can be rotated
//! without touching the callers.

use super::claims::Claims;
use crate::clock::Clock;
use jsonwebtoken::{
    errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use zeroize::Zeroizing;

/// Symmetric key material used to sign and verify tokens
#[derive(Clone)]
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SigningSecret {
    fn from(value: &str) -> Self {
        Self::new(value.as_bytes())
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret([REDACTED; {} bytes])", self.len())
    }
}

/// Ways a token can fail to decode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature is invalid")]
    SignatureInvalid,

    #[error("token has expired")]
    Expired,

    #[error("failed to sign token: {0}")]
    Encode(String),

    #[error("extra claim `{0}` collides with a registered claim")]
    ReservedClaim(String),

    #[error("token lifetime is out of range")]
    LifetimeOutOfRange,
}

/// Encodes claim sets into signed tokens and back
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(secret: &SigningSecret, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked against the injected clock after the signature
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            clock,
        }
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, CodecError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    pub fn decode(&self, token: &str) -> Result<Claims, CodecError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    CodecError::SignatureInvalid
                },
                _ => CodecError::Malformed,
            })?;

        if data.claims.is_expired_at(self.clock.now()) {
            return Err(CodecError::Expired);
        }

        Ok(data.claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &Algorithm::HS256)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
