use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use serde_json::json;

use schoolhub_auth::{Ability, Action, JwtClaims, PackedAbility, PermissionTable, Role, SubjectKind};
use schoolhub_core::{CompanyId, UserId};

const SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = schoolhub_api::app::build_app(SECRET.to_string(), PermissionTable::school());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt(role: Role) -> String {
    let now = Utc::now();
    mint_with_window(role, now, now + ChronoDuration::minutes(10))
}

fn mint_with_window(
    role: Role,
    issued_at: chrono::DateTime<Utc>,
    expires_at: chrono::DateTime<Utc>,
) -> String {
    let claims = JwtClaims {
        sub: UserId::new(),
        company_id: CompanyId::new(),
        role,
        issued_at,
        expires_at,
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn get_json(
    client: &reqwest::Client,
    url: String,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    let res = client.get(url).bearer_auth(token).send().await.unwrap();
    let status = res.status();
    let body = res.json().await.unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_needs_no_token_but_everything_else_does() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/me")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(server.url("/me"))
        .bearer_auth("garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_unauthorized() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let issued = Utc::now() - ChronoDuration::hours(2);
    let token = mint_with_window(Role::ADMIN, issued, issued + ChronoDuration::minutes(10));

    let res = client
        .get(server.url("/me"))
        .bearer_auth(token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn whoami_reports_role_from_token() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, server.url("/me"), &mint_jwt(Role::TEACHER)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "TEACHER");
}

#[tokio::test]
async fn unknown_role_is_a_server_error_not_a_denial() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let token = mint_jwt(Role::new("SUPERVISOR"));
    let (status, body) = get_json(&client, server.url("/can/get/Course"), &token).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "unknown_role");
}

#[tokio::test]
async fn student_checks_by_name() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt(Role::STUDENT);

    let (status, body) = get_json(&client, server.url("/can/get/Course"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "action": "get", "subject": "Course", "allowed": true }));

    let (_, body) = get_json(&client, server.url("/can/pay/MonthlyFee"), &token).await;
    assert_eq!(body["allowed"], false);

    let (_, body) = get_json(&client, server.url("/can/delete/User"), &token).await;
    assert_eq!(body["allowed"], false);

    let (status, body) = get_json(&client, server.url("/can/pay/Course"), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_capability");

    let (status, body) = get_json(&client, server.url("/can/fly/Course"), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unknown_action");
}

#[tokio::test]
async fn instance_checks_resolve_through_typename() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let company = json!({
        "__typename": "Company",
        "id": CompanyId::new().to_string(),
        "owner_id": UserId::new().to_string(),
    });

    for (role, action, expected) in [
        (Role::ADMIN, "update", true),
        (Role::TEACHER, "update", false),
        (Role::TEACHER, "get", true),
        (Role::STUDENT, "get", false),
    ] {
        let res = client
            .post(server.url("/can"))
            .bearer_auth(mint_jwt(role.clone()))
            .json(&json!({ "action": action, "subject": company }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["subject"], "Company");
        assert_eq!(body["allowed"], expected, "{role} {action}");

        let (_, by_name) = get_json(
            &client,
            server.url(&format!("/can/{action}/Company")),
            &mint_jwt(role),
        )
        .await;
        assert_eq!(by_name["allowed"], body["allowed"]);
    }
}

#[tokio::test]
async fn packed_ability_rebuilds_on_the_client() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(server.url("/me/ability"))
        .bearer_auth(mint_jwt(Role::TEACHER))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let packed: PackedAbility = res.json().await.unwrap();
    assert_eq!(packed.role, Role::TEACHER);

    let ability = Ability::unpack(packed).unwrap();
    assert!(ability.can(Action::Grade, SubjectKind::Task));
    assert!(ability.can(Action::Create, SubjectKind::Material));
    assert!(ability.cannot(Action::Get, SubjectKind::Billing));
}

#[tokio::test]
async fn rbac_listing_is_gated_by_role_read() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) =
        get_json(&client, server.url("/rbac/roles"), &mint_jwt(Role::STUDENT)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let admin = mint_jwt(Role::ADMIN);
    let (status, body) = get_json(&client, server.url("/rbac/roles"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roles"].as_array().unwrap().len(), 3);

    let (status, body) = get_json(&client, server.url("/rbac/roles/STUDENT"), &admin).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"]["name"], "STUDENT");

    let (status, _) = get_json(&client, server.url("/rbac/roles/JANITOR"), &admin).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn explain_own_and_other_roles() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let student = mint_jwt(Role::STUDENT);

    let (status, body) = get_json(
        &client,
        server.url("/rbac/explain?action=grade&subject=Task"),
        &student,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"]["granted"], false);
    assert_eq!(body["explanation"]["denial_reason"]["kind"], "missing_grant");

    let (status, _) = get_json(
        &client,
        server.url("/rbac/explain?action=grade&subject=Task&role=TEACHER"),
        &student,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = get_json(
        &client,
        server.url("/rbac/explain?action=grade&subject=Task&role=TEACHER"),
        &mint_jwt(Role::ADMIN),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["explanation"]["granted"], true);
    assert_eq!(body["explanation"]["user"]["role"], "TEACHER");
}

#[tokio::test]
async fn capability_schema_is_published() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let (status, body) =
        get_json(&client, server.url("/capabilities"), &mint_jwt(Role::STUDENT)).await;
    assert_eq!(status, StatusCode::OK);

    let subjects = body["subjects"].as_array().unwrap();
    assert_eq!(subjects.len(), SubjectKind::ALL.len());
    let all = subjects.iter().find(|s| s["name"] == "all").unwrap();
    assert_eq!(all["actions"], json!(["manage"]));
}
