//! HTTP routes for the directory.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                 - Liveness check
//! GET  /health/ready                           - Readiness check
//!
//! # UserService (JSON RPC)
//! POST /user.v1.UserService/CreateUser         - Create a user
//! POST /user.v1.UserService/GetUser            - Fetch a user by id
//! POST /user.v1.UserService/UpdateUser         - Patch a user
//! POST /user.v1.UserService/ValidateEmail      - Email format + availability
//! POST /user.v1.UserService/CheckUsername      - Username availability
//! POST /user.v1.UserService/AuthenticateUser   - Email/password check
//! ```

pub mod users;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the `UserService` RPC router.
pub fn user_service_routes() -> Router<AppState> {
    Router::new()
        .route("/CreateUser", post(users::create_user))
        .route("/GetUser", post(users::get_user))
        .route("/UpdateUser", post(users::update_user))
        .route("/ValidateEmail", post(users::validate_email))
        .route("/CheckUsername", post(users::check_username))
        .route("/AuthenticateUser", post(users::authenticate_user))
}

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/user.v1.UserService", user_service_routes())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Always answers 200 once it gets the directory's read lock. It has no
/// failure status: a wedged store makes the probe hang until the caller's
/// timeout, never return an error.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let users = state.directory().user_count();
    tracing::debug!(users, "readiness probe");
    StatusCode::OK
}
