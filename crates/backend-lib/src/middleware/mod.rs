// crates/backend-lib/src/middleware/mod.rs

//! Request guards for the `warden` HTTP surface.
//!
//! Each guard is an axum middleware; [`GuardPipeline`] stacks them in order
//! on a route group.

pub mod authenticate;
pub mod ownership;
pub mod pipeline;
pub mod rate_limit;

pub use authenticate::{authenticate, bearer_token};
pub use ownership::{enforce_ownership, OWNER_PARAM};
pub use pipeline::{GuardPipeline, Stage};
pub use rate_limit::{rate_limit, requester_key};
