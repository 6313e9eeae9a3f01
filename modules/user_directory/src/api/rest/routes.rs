use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::rest::handlers::{self, UsersApiState};

/// Users API:
/// - `GET /api/users`
/// - `GET /api/users/view`
/// - `GET /api/health`
///
/// CORS is open to every origin, matching the browser front-ends that call it.
pub fn router(state: Arc<UsersApiState>) -> Router {
    Router::new()
        .route("/api/users", get(handlers::list_users))
        .route("/api/users/view", get(handlers::users_view))
        .route("/api/health", get(handlers::health))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
