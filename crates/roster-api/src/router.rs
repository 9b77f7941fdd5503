//! Route definitions for the Roster HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::http::{Method, StatusCode, Uri};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::handlers;
use crate::middleware;
use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(me_routes())
        .merge(user_routes())
        .merge(health_routes())
        .merge(seed_routes(state.clone()));

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::logging::request_logging,
        ))
        .layer(build_compression_layer())
        .layer(build_cors_layer(&state.config.server.cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Auth endpoints: login, logout, password flows
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", get(handlers::auth::logout))
        .route("/auth/change-password", post(handlers::auth::change_password))
        .route("/auth/forgot-password", post(handlers::auth::forgot_password))
        .route("/auth/reset-password", post(handlers::auth::reset_password))
        .route(
            "/auth/reset-password/token-status",
            post(handlers::auth::token_status),
        )
}

/// Current user endpoints
fn me_routes() -> Router<AppState> {
    Router::new().route(
        "/me",
        get(handlers::me::get_me).patch(handlers::me::update_me),
    )
}

/// Admin user management
fn user_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::users::get_user)
                .patch(handlers::users::update_user)
                .delete(handlers::users::delete_user),
        )
        .route("/users/{id}/restore", post(handlers::users::restore_user))
        .route("/users/{id}/reinvite", post(handlers::users::reinvite_user))
}

/// Health checks
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/healthcheck", get(handlers::health::healthcheck))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
}

/// Seed endpoints, refused in production
fn seed_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/seed/reset", post(handlers::seed::reset))
        .route("/seed/user", post(handlers::seed::create_user))
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::environment::non_production_only,
        ))
}

async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::http(
        StatusCode::NOT_FOUND,
        format!("Cannot {method} {}", uri.path()),
    )
}
