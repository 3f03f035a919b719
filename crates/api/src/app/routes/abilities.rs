//! Ability endpoints: what the current user may do.
//!
//! Front-ends fetch `/me/ability` once and gate their UI locally; the `/can`
//! endpoints answer one-off checks.

use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use schoolhub_auth::{
    registry, Ability, Action, Capability, JsonSubject, PackedAbility, Subject, SubjectKind,
};

use crate::app::errors;

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub action: Action,
    pub subject: SubjectKind,
    pub allowed: bool,
}

/// Body of `POST /can`: the subject is an instance carrying `__typename`.
#[derive(Debug, Deserialize)]
pub struct CheckInstanceRequest {
    pub action: Action,
    pub subject: JsonSubject,
}

/// GET /me/ability - Packed rules of the current user
pub async fn my_ability(Extension(ability): Extension<Ability>) -> Json<PackedAbility> {
    Json(ability.pack())
}

/// GET /can/:action/:subject - Check one capability by name
pub async fn check(
    Extension(ability): Extension<Ability>,
    Path((action, subject)): Path<(String, String)>,
) -> Response {
    let capability = match Capability::parse(&action, &subject) {
        Ok(capability) => capability,
        Err(e) => return errors::auth_error_to_response(e),
    };

    Json(CheckResponse {
        action: capability.action(),
        subject: capability.subject(),
        allowed: ability.allows(capability),
    })
    .into_response()
}

/// POST /can - Check an action against a subject instance
pub async fn check_instance(
    Extension(ability): Extension<Ability>,
    Json(request): Json<CheckInstanceRequest>,
) -> Response {
    let subject = request.subject.subject_kind();
    if let Err(e) = Capability::new(request.action, subject) {
        return errors::auth_error_to_response(e);
    }

    Json(CheckResponse {
        action: request.action,
        subject,
        allowed: ability.can(request.action, &request.subject),
    })
    .into_response()
}

/// GET /capabilities - The capability schema, subject by subject
pub async fn capabilities() -> impl IntoResponse {
    Json(serde_json::json!({ "subjects": registry::subject_definitions() }))
}
