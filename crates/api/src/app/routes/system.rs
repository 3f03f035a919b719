use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use schoolhub_auth::User;

use crate::context::CompanyContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(company): Extension<CompanyContext>,
    Extension(user): Extension<User>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "company_id": company.company_id().to_string(),
        "user_id": user.id.to_string(),
        "role": user.role.as_str(),
    }))
}
