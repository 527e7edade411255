// ================
// crates/common/src/lib.rs
// ================
//! Common types and structures
//! used for communication between `warden` clients and the server.
//! This module defines the JSON bodies of the auth and task endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /auth/register`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Body of `POST /auth/login`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of `POST /auth/refresh`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Response to a successful registration (201)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegisterResponse {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response to a successful login (200)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResponse {
    pub user_id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response to a successful token refresh (200)
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Public fields of an account, as returned by `GET /auth/me`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A task owned by a single user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/{user_id}/tasks`
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `PUT /api/{user_id}/tasks/{task_id}`; absent fields are left unchanged
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Error envelope returned by every failing endpoint
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Stable error code plus a human readable message
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}
