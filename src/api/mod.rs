//! JSON request layer.
//!
//! Two route groups sit behind the session middleware: `/admin/*` for the back office
//! and `/user/*` for cashiers. `/health` is open.

pub mod error;
pub mod extract;
pub mod routes;
pub mod session;

use axum::{Json, Router, middleware, routing::get};
use sea_orm::DatabaseConnection;
use serde_json::{Value, json};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Connection pool
    pub db: DatabaseConnection,
}

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest(
            "/admin",
            routes::admin_router().route_layer(middleware::from_fn(session::require_admin)),
        )
        .nest(
            "/user",
            routes::user_router().route_layer(middleware::from_fn(session::require_user)),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(protected)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
