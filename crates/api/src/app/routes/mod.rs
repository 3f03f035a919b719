use axum::{
    routing::{get, post},
    Router,
};

pub mod abilities;
pub mod rbac;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/me", get(system::whoami))
        .route("/me/ability", get(abilities::my_ability))
        .route("/can", post(abilities::check_instance))
        .route("/can/:action/:subject", get(abilities::check))
        .route("/capabilities", get(abilities::capabilities))
        .nest("/rbac", rbac::router())
}
