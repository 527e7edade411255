// ============================
// crates/backend-lib/src/auth/service_impl.rs
// ============================
use super::claims::ExtraClaims;
use super::issuer::TokenIssuer;
use super::password::{
    hash_password_secure, hash_password_with_cost, verify_password, PasswordRequirements,
};
use super::renewal::RenewalService;
use super::service::AuthService;
use crate::clock::Clock;
use crate::error::AppError;
use crate::metrics;
use crate::storage::{UserRecord, UserStore};
use crate::validation;
use async_trait::async_trait;
use chrono::Duration;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;
use warden_common::{
    LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, RegisterResponse, UserProfile,
};
use zeroize::Zeroize;

/// Plaintext behind the stand-in hash checked for unknown accounts
const DUMMY_PASSWORD: &str = "warden-unknown-account";

/// Account flows on top of a [`UserStore`]
pub struct DefaultAuth<S> {
    users: S,
    issuer: TokenIssuer,
    renewal: RenewalService,
    clock: Arc<dyn Clock>,
    /// Access lifetime for tokens handed out at login and registration
    session_access_ttl: Duration,
    password_requirements: PasswordRequirements,
    hash_log_n: u8,
    /// Hash verified when the email is unknown, so both login failures cost the same
    dummy_hash: Arc<OnceLock<String>>,
}

impl<S: UserStore> DefaultAuth<S> {
    pub fn new(
        users: S,
        issuer: TokenIssuer,
        renewal: RenewalService,
        clock: Arc<dyn Clock>,
        session_access_ttl: Duration,
    ) -> Self {
        Self {
            users,
            issuer,
            renewal,
            clock,
            session_access_ttl,
            password_requirements: PasswordRequirements::default(),
            hash_log_n: super::password::DEFAULT_HASH_LOG_N,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    pub fn with_password_policy(
        mut self,
        requirements: PasswordRequirements,
        hash_log_n: u8,
    ) -> Self {
        self.password_requirements = requirements;
        self.hash_log_n = hash_log_n;
        self
    }

    /// Access + refresh pair for `user`
    fn token_pair(&self, user: &UserRecord) -> Result<(String, String), AppError> {
        let mut extra = ExtraClaims::new();
        extra.insert("email".to_string(), Value::String(user.email.clone()));
        extra.insert("name".to_string(), Value::String(user.name.clone()));

        let access = self
            .issuer
            .issue_access(&user.id, extra.clone(), Some(self.session_access_ttl))
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let refresh = self
            .issuer
            .issue_refresh(&user.id, extra, None)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        Ok((access.token, refresh.token))
    }
}

#[async_trait]
impl<S: UserStore + 'static> AuthService for DefaultAuth<S> {
    async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse, AppError> {
        let RegisterRequest {
            email,
            mut password,
            name,
        } = request;

        let email = validation::normalize_email(&email);
        validation::validate_email(&email)?;
        let name = validation::validate_name(&name)?.to_string();
        let strength = validation::validate_password(&password, &self.password_requirements)
            .map(|_| ());
        if let Err(e) = strength {
            password.zeroize();
            return Err(e.into());
        }

        let log_n = self.hash_log_n;
        let password_hash =
            tokio::task::spawn_blocking(move || hash_password_secure(&mut password, log_n))
                .await??;

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            email,
            name,
            password_hash,
            created_at: self.clock.now(),
        };

        if let Err(e) = self.users.insert_user(user.clone()).await {
            if matches!(e, AppError::Conflict(_)) {
                ::metrics::counter!(metrics::AUTH_REGISTER_CONFLICT).increment(1);
                tracing::info!("registration rejected: email already registered");
            }
            return Err(e);
        }

        let (access_token, refresh_token) = self.token_pair(&user)?;
        ::metrics::counter!(metrics::AUTH_REGISTERED).increment(1);
        tracing::info!(user_id = %user.id, "registered new account");

        Ok(RegisterResponse {
            user_id: user.id,
            email: user.email,
            name: user.name,
            access_token,
            refresh_token,
        })
    }

    async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        let LoginRequest { email, password } = request;
        let email = validation::normalize_email(&email);

        let user = self.users.find_by_email(&email).await?;
        let stored_hash = user.as_ref().map(|user| user.password_hash.clone());
        let dummy_hash = self.dummy_hash.clone();
        let log_n = self.hash_log_n;
        let matches = tokio::task::spawn_blocking(move || {
            let mut password = password;
            let ok = match stored_hash {
                Some(hash) => verify_password(&hash, &password),
                None => {
                    let hash = dummy_hash.get_or_init(|| {
                        hash_password_with_cost(DUMMY_PASSWORD, log_n).unwrap_or_default()
                    });
                    verify_password(hash, &password);
                    false
                }
            };
            password.zeroize();
            ok
        })
        .await?;

        let Some(user) = user else {
            ::metrics::counter!(metrics::AUTH_LOGIN_FAILED).increment(1);
            tracing::info!("login failed: unknown account");
            return Err(AppError::InvalidCredentials);
        };

        if !matches {
            ::metrics::counter!(metrics::AUTH_LOGIN_FAILED).increment(1);
            tracing::info!(user_id = %user.id, "login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let (access_token, refresh_token) = self.token_pair(&user)?;
        ::metrics::counter!(metrics::AUTH_LOGIN_SUCCEEDED).increment(1);
        tracing::info!(user_id = %user.id, "login succeeded");

        Ok(LoginResponse {
            user_id: user.id,
            email: user.email,
            access_token,
            refresh_token,
        })
    }

    async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, AppError> {
        match self.renewal.refresh(refresh_token) {
            Ok(access) => {
                ::metrics::counter!(metrics::AUTH_REFRESHED).increment(1);
                tracing::debug!(user_id = %access.subject, "access token renewed");
                Ok(RefreshResponse {
                    access_token: access.token,
                })
            },
            Err(failure) => {
                ::metrics::counter!(metrics::AUTH_REJECTED).increment(1);
                tracing::debug!(reason = %failure, "refresh token rejected");
                Err(AppError::Unauthenticated(failure))
            },
        }
    }

    async fn current_user(&self, user_id: &str) -> Result<UserProfile, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.profile())
            .ok_or(AppError::Unauthenticated(super::AuthFailure::Invalid))
    }
}
