use super::*;

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, 30, "geotrack-test")
        .expect("client construction should not fail")
}

#[test]
fn endpoint_joins_segments_onto_root() {
    let client = test_client("http://localhost:8000");
    let url = client.endpoint(&["api", "runs", "job-1", "status"], &[]);
    assert_eq!(url.as_str(), "http://localhost:8000/api/runs/job-1/status");
}

#[test]
fn endpoint_keeps_path_prefix_and_strips_trailing_slash() {
    let client = test_client("https://geo.example.com/backend/");
    let url = client.endpoint(&["api", "runs"], &[("limit", "20")]);
    assert_eq!(
        url.as_str(),
        "https://geo.example.com/backend/api/runs?limit=20"
    );
}

#[test]
fn endpoint_encodes_identifiers() {
    let client = test_client("http://localhost:8000");
    let url = client.endpoint(&["api", "brands", "search", "Acme/Co?x"], &[]);
    assert_eq!(
        url.as_str(),
        "http://localhost:8000/api/brands/search/Acme%2FCo%3Fx"
    );
}

#[test]
fn endpoint_encodes_query_values() {
    let client = test_client("http://localhost:8000");
    let url = client.endpoint(
        &["api", "sheets", "validate"],
        &[("url", "https://docs.google.com/spreadsheets/d/abc/edit#gid=0")],
    );
    assert!(
        !url.as_str().contains('#'),
        "fragment must be encoded into the query value: {url}"
    );
}

#[test]
fn rejects_non_http_base_urls() {
    assert!(matches!(
        ApiClient::new("not a url", 30, "ua"),
        Err(ApiError::InvalidUrl { .. })
    ));
    assert!(matches!(
        ApiClient::new("mailto:ops@example.com", 30, "ua"),
        Err(ApiError::InvalidUrl { .. })
    ));
}

#[test]
fn blank_token_is_ignored_and_debug_redacts() {
    let client = test_client("http://localhost:8000").with_token(Some("  ".to_string()));
    assert!(!client.has_token());

    let client = client.with_token(Some("secret-token".to_string()));
    assert!(client.has_token());
    let rendered = format!("{client:?}");
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("[redacted]"));
}
