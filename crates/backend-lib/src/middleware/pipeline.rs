// crates/backend-lib/src/middleware/pipeline.rs

//! Ordered guard stages for a route group.
use super::{authenticate, enforce_ownership, rate_limit};
use crate::auth::{RateGate, TokenVerifier};
use axum::{middleware, Router};
use std::sync::Arc;

/// One guard in a [`GuardPipeline`]
#[derive(Debug, Clone)]
pub enum Stage {
    /// Throttle by requester key; 429 on denial
    RateLimit(Arc<RateGate>),
    /// Require a valid access token; 401 on failure
    Authenticate(Arc<TokenVerifier>),
    /// Require `{user_id}` to match the verified caller; 403 on mismatch
    Ownership,
}

/// Guards applied to a route group, run in the order they were added
#[derive(Debug, Clone, Default)]
pub struct GuardPipeline {
    stages: Vec<Stage>,
}

impl GuardPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rate_limit(mut self, gate: Arc<RateGate>) -> Self {
        self.stages.push(Stage::RateLimit(gate));
        self
    }

    pub fn authenticate(mut self, verifier: Arc<TokenVerifier>) -> Self {
        self.stages.push(Stage::Authenticate(verifier));
        self
    }

    pub fn ownership(mut self) -> Self {
        self.stages.push(Stage::Ownership);
        self
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Wrap every route already in `router` with the stages.
    ///
    /// Route layers only reach routes that exist when they are added, so
    /// call this after the group's routes are registered. The last layer
    /// added runs first, hence the reverse fold.
    pub fn apply<S>(&self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        self.stages
            .iter()
            .rev()
            .fold(router, |router, stage| match stage {
                Stage::RateLimit(gate) => {
                    router.route_layer(middleware::from_fn_with_state(gate.clone(), rate_limit))
                },
                Stage::Authenticate(verifier) => router.route_layer(
                    middleware::from_fn_with_state(verifier.clone(), authenticate),
                ),
                Stage::Ownership => router.route_layer(middleware::from_fn(enforce_ownership)),
            })
    }
}
