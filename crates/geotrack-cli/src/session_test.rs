use std::path::Path;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

fn config(api_url: &str, session_path: &Path, env_token: Option<&str>) -> AppConfig {
    AppConfig {
        api_url: api_url.to_string(),
        api_token: env_token.map(str::to_string),
        log_level: "info".to_string(),
        request_timeout_secs: 5,
        poll_interval_ms: 2000,
        user_agent: "geotrack-test".to_string(),
        session_path: Some(session_path.to_path_buf()),
    }
}

fn admin_user() -> serde_json::Value {
    serde_json::json!({
        "email": "ops@example.com",
        "name": "Ops",
        "role": "admin",
        "permissions": {"can_access_admin": true, "can_view_leads": true}
    })
}

#[test]
fn init_without_file_uses_env_token() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");

    let session = Session::init(&config("http://localhost:8000", &file, Some("env-token"))).unwrap();
    assert!(session.is_authenticated());
    assert!(session.user().is_none());

    let anonymous = Session::init(&config("http://localhost:8000", &file, None)).unwrap();
    assert!(!anonymous.is_authenticated());
}

#[test]
fn init_prefers_stored_session_over_env_token() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    let stored = StoredSession {
        token: "stored-token".to_string(),
        user: Some(serde_json::from_value(admin_user()).unwrap()),
        saved_at: None,
    };
    write_stored(&file, &stored).unwrap();

    let session = Session::init(&config("http://localhost:8000", &file, Some("env-token"))).unwrap();
    assert!(session.is_authenticated());
    assert_eq!(session.user().unwrap().email, "ops@example.com");
}

#[test]
fn corrupt_session_file_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    std::fs::write(&file, "{not json").unwrap();

    let session = Session::init(&config("http://localhost:8000", &file, None)).unwrap();
    assert!(!session.is_authenticated());
}

#[test]
fn logout_removes_file_and_credential() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    let stored = StoredSession {
        token: "stored-token".to_string(),
        user: None,
        saved_at: None,
    };
    write_stored(&file, &stored).unwrap();

    let mut session = Session::init(&config("http://localhost:8000", &file, None)).unwrap();
    assert!(session.logout().unwrap());
    assert!(!file.exists());
    assert!(!session.is_authenticated());
    assert!(!session.logout().unwrap());
}

#[tokio::test]
async fn login_verifies_and_persists_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .and(header("authorization", "Bearer good-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"valid": true, "user": admin_user()})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nested").join("session.json");
    let mut session = Session::init(&config(&server.uri(), &file, None)).unwrap();

    let user = session.login("  good-token ").await.unwrap();
    assert!(user.has_admin_access());
    assert!(session.is_authenticated());

    let stored: StoredSession =
        serde_json::from_str(&std::fs::read_to_string(&file).unwrap()).unwrap();
    assert_eq!(stored.token, "good-token");
    assert_eq!(stored.user.unwrap().email, "ops@example.com");
    assert!(stored.saved_at.is_some());
}

#[tokio::test]
async fn rejected_login_leaves_session_untouched() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/verify"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(serde_json::json!({"detail": "Invalid token"})),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session.json");
    let mut session = Session::init(&config(&server.uri(), &file, None)).unwrap();

    let err = session.login("bad-token").await.unwrap_err();
    assert!(err.to_string().contains("rejected"));
    assert!(!session.is_authenticated());
    assert!(!file.exists());
}
