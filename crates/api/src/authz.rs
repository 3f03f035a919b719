//! Handler-side authorization guard.
//!
//! The middleware has already built the request's `Ability`; handlers call
//! [`require`] before doing any work.

use axum::{http::StatusCode, response::Response};

use schoolhub_auth::{Ability, Action, Subject};

use crate::app::errors;

/// `Ok(())` when the ability covers `(action, subject)`, a 403 response otherwise.
pub fn require(ability: &Ability, action: Action, subject: impl Subject) -> Result<(), Response> {
    ability.authorize(action, subject).map_err(|e| {
        tracing::info!(role = %ability.role(), error = %e, "request denied");
        errors::json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
    })
}
