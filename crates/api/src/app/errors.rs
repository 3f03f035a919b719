use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use schoolhub_auth::AuthError;

pub fn auth_error_to_response(err: AuthError) -> axum::response::Response {
    match err {
        // A user persisted with a role that has no policy is a data bug, not a denial.
        AuthError::UnknownRole(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "unknown_role", err.to_string())
        }
        AuthError::MalformedCapability { .. } => {
            json_error(StatusCode::BAD_REQUEST, "invalid_capability", err.to_string())
        }
        AuthError::UnknownAction(_) => {
            json_error(StatusCode::BAD_REQUEST, "unknown_action", err.to_string())
        }
        AuthError::UnknownSubject(_) => {
            json_error(StatusCode::BAD_REQUEST, "unknown_subject", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
