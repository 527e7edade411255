// ============================
// crates/backend-lib/src/lib.rs
// ============================
//! Core backend-lib functionality for the `warden` API server.
//!
//! Request authorization for a multi-tenant resource API: signed access and
//! refresh tokens, per-requester sliding-window throttling, and ownership
//! checks that keep every tenant inside its own `/api/{user_id}` namespace.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod storage;
pub mod validation;

use crate::auth::{
    AuthService, DefaultAuth, RateGate, RenewalService, TokenCodec, TokenIssuer, TokenVerifier,
};
use crate::clock::{Clock, SystemClock};
use crate::config::Settings;
use crate::storage::{TaskStore, UserStore};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Validated settings
    pub settings: Arc<Settings>,
    /// Account flows (register, login, refresh, profile)
    pub auth: Arc<dyn AuthService>,
    /// Access-token verifier used by the authenticate stage
    pub verifier: Arc<TokenVerifier>,
    /// Gate in front of the protected API
    pub api_gate: Arc<RateGate>,
    /// Gate in front of the credential entry points
    pub auth_gate: Arc<RateGate>,
    /// Demo resource owned per user
    pub tasks: TaskStore,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Create a new application state on the system clock
    pub fn new<S: UserStore + 'static>(users: S, settings: &Settings) -> anyhow::Result<Self> {
        Self::with_clock(users, settings, Arc::new(SystemClock))
    }

    /// Create a new application state on an explicit clock
    pub fn with_clock<S: UserStore + 'static>(
        users: S,
        settings: &Settings,
        clock: Arc<dyn Clock>,
    ) -> anyhow::Result<Self> {
        settings.validate()?;

        let codec = Arc::new(TokenCodec::new(
            &settings.auth.signing_secret(),
            clock.clone(),
        ));
        let issuer = TokenIssuer::with_ttls(
            codec.clone(),
            settings.auth.access_ttl(),
            settings.auth.refresh_ttl(),
        );
        let verifier = TokenVerifier::new(codec);
        let renewal = RenewalService::new(verifier.clone(), issuer.clone());
        let auth = DefaultAuth::new(
            users,
            issuer,
            renewal,
            clock.clone(),
            settings.auth.session_access_ttl(),
        )
        .with_password_policy(
            settings.password.requirements.clone(),
            settings.password.hash_log_n,
        );

        Ok(Self {
            settings: Arc::new(settings.clone()),
            auth: Arc::new(auth),
            verifier: Arc::new(verifier),
            api_gate: Arc::new(RateGate::new(&settings.rate_limit, clock.clone())),
            auth_gate: Arc::new(RateGate::new(&settings.auth_rate_limit, clock.clone())),
            tasks: TaskStore::new(),
            clock,
        })
    }
}
