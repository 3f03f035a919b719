use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use schoolhub_auth::{JwtClaims, JwtValidator, PermissionTable};

use crate::app::errors;
use crate::context::CompanyContext;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
    pub permissions: Arc<PermissionTable>,
}

/// Authenticate the request and build its ability.
///
/// Inserts `CompanyContext`, `User` and `Ability` into the request extensions.
/// The ability is built exactly once per request; handlers only query it.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Response {
    let claims = match authenticate(state.jwt.as_ref(), req.headers()) {
        Ok(claims) => claims,
        Err(status) => return status.into_response(),
    };

    let user = claims.user();
    let ability = match state.permissions.define_ability_for(&user) {
        Ok(ability) => ability,
        Err(e) => return errors::auth_error_to_response(e),
    };

    req.extensions_mut()
        .insert(CompanyContext::new(claims.company_id));
    req.extensions_mut().insert(user);
    req.extensions_mut().insert(ability);

    next.run(req).await
}

fn authenticate(jwt: &dyn JwtValidator, headers: &HeaderMap) -> Result<JwtClaims, StatusCode> {
    let token = extract_bearer(headers)?;

    jwt.validate(token, Utc::now()).map_err(|e| {
        tracing::debug!(error = %e, "rejected bearer token");
        StatusCode::UNAUTHORIZED
    })
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
