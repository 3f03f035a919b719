//! RBAC audit endpoints for transparent authorization debugging.
//!
//! These endpoints provide visibility into roles, their grants and individual
//! decisions, to answer "why was this request denied?".

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use schoolhub_auth::{
    explain_authorization, Ability, Action, PermissionTable, RbacRegistry, Role, SubjectKind, User,
};

use crate::app::errors;
use crate::authz;

// ─────────────────────────────────────────────────────────────────────────────
// Query Parameters
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub action: String,
    pub subject: String,
    /// Explain for another role instead of the caller's own.
    pub role: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Router
// ─────────────────────────────────────────────────────────────────────────────

pub fn router() -> Router {
    Router::new()
        .route("/roles", get(list_roles))
        .route("/roles/:name", get(get_role))
        .route("/explain", get(explain))
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /rbac/roles - List all roles and their grants
pub async fn list_roles(
    Extension(permissions): Extension<Arc<PermissionTable>>,
    Extension(ability): Extension<Ability>,
) -> Response {
    if let Err(denied) = authz::require(&ability, Action::Get, SubjectKind::Role) {
        return denied;
    }

    match RbacRegistry::from_table(&permissions) {
        Ok(registry) => {
            let roles: Vec<_> = registry.roles.into_values().collect();
            (StatusCode::OK, Json(serde_json::json!({ "roles": roles }))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}

/// GET /rbac/roles/:name - Get one role and its grants
pub async fn get_role(
    Extension(permissions): Extension<Arc<PermissionTable>>,
    Extension(ability): Extension<Ability>,
    Path(name): Path<String>,
) -> Response {
    if let Err(denied) = authz::require(&ability, Action::Get, SubjectKind::Role) {
        return denied;
    }

    let registry = match RbacRegistry::from_table(&permissions) {
        Ok(registry) => registry,
        Err(e) => return errors::auth_error_to_response(e),
    };

    match registry.role(&name) {
        Some(role) => (StatusCode::OK, Json(serde_json::json!({ "role": role }))).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found"),
    }
}

/// GET /rbac/explain?action=X&subject=Y[&role=Z] - Explain an authorization decision
///
/// Any authenticated user may explain their own decisions; explaining another
/// role requires reading roles.
pub async fn explain(
    Extension(permissions): Extension<Arc<PermissionTable>>,
    Extension(user): Extension<User>,
    Extension(ability): Extension<Ability>,
    Query(query): Query<ExplainQuery>,
) -> Response {
    let action: Action = match query.action.parse() {
        Ok(action) => action,
        Err(e) => return errors::auth_error_to_response(e),
    };
    let subject: SubjectKind = match query.subject.parse() {
        Ok(subject) => subject,
        Err(e) => return errors::auth_error_to_response(e),
    };

    let explained_user = match query.role {
        Some(role) if role != user.role.as_str() => {
            if let Err(denied) = authz::require(&ability, Action::Get, SubjectKind::Role) {
                return denied;
            }
            let role = Role::new(role);
            if !permissions.contains(&role) {
                return errors::json_error(StatusCode::NOT_FOUND, "not_found", "role not found");
            }
            User::new(user.id, role)
        }
        _ => user,
    };

    match explain_authorization(&permissions, &explained_user, action, subject) {
        Ok(explanation) => {
            (StatusCode::OK, Json(serde_json::json!({ "explanation": explanation }))).into_response()
        }
        Err(e) => errors::auth_error_to_response(e),
    }
}
