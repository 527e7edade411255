// =============
// crates/backend-lib/src/auth/service.rs
// =============
//! This module defines the `AuthService` trait, which backs the `/auth/*` endpoints
use crate::error::AppError;
use async_trait::async_trait;
use warden_common::{
    LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, RegisterResponse, UserProfile,
};

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AppError>;

    /// Check credentials and hand out a fresh token pair
    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError>;

    /// Exchange a refresh token for a new access token
    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AppError>;

    /// Public profile of an authenticated account
    async fn current_user(&self, user_id: &str) -> Result<UserProfile, AppError>;
}
