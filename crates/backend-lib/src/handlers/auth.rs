// crates/backend-lib/src/handlers/auth.rs

//! `/auth/*` endpoints.
use crate::auth::AuthenticatedUser;
use crate::error::AppError;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use warden_common::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, UserProfile,
};

/// `POST /auth/register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let response = state.auth.register(body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(state.auth.login(body).await?))
}

/// `POST /auth/refresh`
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    Ok(Json(state.auth.refresh(&body.refresh_token).await?))
}

/// `GET /auth/me`
pub async fn me(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, AppError> {
    Ok(Json(state.auth.current_user(&user.user_id).await?))
}
