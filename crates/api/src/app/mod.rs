//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use schoolhub_auth::PermissionTable;

use crate::middleware;

pub mod errors;
pub mod routes;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// `permissions` is the process-wide permission table; it is frozen here and
/// shared read-only by every request.
pub fn build_app(jwt_secret: String, permissions: PermissionTable) -> Router {
    let jwt = Arc::new(schoolhub_auth::Hs256JwtValidator::new(jwt_secret.into_bytes()));
    let permissions = Arc::new(permissions);
    let auth_state = middleware::AuthState {
        jwt,
        permissions: permissions.clone(),
    };

    // Protected routes: require auth; every request gets its own ability.
    let protected = routes::router()
        .layer(Extension(permissions))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            middleware::auth_middleware,
        ));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
        .layer(ServiceBuilder::new())
}
