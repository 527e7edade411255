// ============================
// crates/backend-lib/src/router.rs
// ============================
//! Route table and guard wiring.
use crate::handlers::{self, auth, tasks};
use crate::middleware::GuardPipeline;
use crate::AppState;
use axum::{
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Create the application router
///
/// | group                       | guards                            |
/// |-----------------------------|-----------------------------------|
/// | `/auth/register,login,refresh` | auth gate                      |
/// | `/auth/me`                  | api gate, authenticate            |
/// | `/api/{user_id}/...`        | api gate, authenticate, ownership |
/// | `/health`                   | none                              |
pub fn create_router(state: Arc<AppState>) -> Router {
    let entry_points: Router<Arc<AppState>> = GuardPipeline::new()
        .rate_limit(state.auth_gate.clone())
        .apply(
            Router::new()
                .route("/auth/register", post(auth::register))
                .route("/auth/login", post(auth::login))
                .route("/auth/refresh", post(auth::refresh)),
        );

    let account: Router<Arc<AppState>> = GuardPipeline::new()
        .rate_limit(state.api_gate.clone())
        .authenticate(state.verifier.clone())
        .apply(Router::new().route("/auth/me", get(auth::me)));

    let owned: Router<Arc<AppState>> = GuardPipeline::new()
        .rate_limit(state.api_gate.clone())
        .authenticate(state.verifier.clone())
        .ownership()
        .apply(
            Router::new()
                .route(
                    "/api/{user_id}/tasks",
                    get(tasks::list_tasks).post(tasks::create_task),
                )
                .route(
                    "/api/{user_id}/tasks/{task_id}",
                    get(tasks::get_task)
                        .put(tasks::update_task)
                        .delete(tasks::delete_task),
                )
                .route(
                    "/api/{user_id}/tasks/{task_id}/complete",
                    patch(tasks::toggle_task),
                ),
        );

    let router = Router::<Arc<AppState>>::new()
        .route("/health", get(handlers::health))
        .merge(entry_points)
        .merge(account)
        .merge(owned)
        .layer(TraceLayer::new_for_http());

    let router = if state.settings.server.cors_allow_any_origin {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router.with_state(state)
}
