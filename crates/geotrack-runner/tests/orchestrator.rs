//! End-to-end orchestration against a wiremock backend.

use geotrack_api::ApiClient;
use geotrack_core::{parse_queries, Provider, ProviderSet, RunConfig};
use geotrack_runner::{OrchestratorOptions, RunOrchestrator, RunPhase};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ApiClient {
    ApiClient::new(base_url, 5, "geotrack-test").expect("client construction should not fail")
}

fn status_body(status: &str, completed: u32) -> serde_json::Value {
    serde_json::json!({
        "run_id": "run-42",
        "status": status,
        "total_tasks": 2,
        "completed_tasks": completed,
        "failed_tasks": 0,
        "progress_percent": f64::from(completed) * 50.0
    })
}

async fn mount_start(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/runs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job_id": "job-42",
            "run_id": "run-42",
            "status": "pending"
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn polls_until_completed_then_fetches_results_once() {
    let server = MockServer::start().await;
    mount_start(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/runs/job-42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("running", 1)))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/runs/job-42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("completed", 2)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/runs/job-42/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "summary": {
                "run_id": "run-42",
                "brand_name": "Acme",
                "status": "completed",
                "total_queries": 1,
                "total_responses": 2,
                "overall_visibility": 50.0
            },
            "results": [
                {"question": "best crm?", "provider": "openai", "model": "gpt-4.1-mini",
                 "response_text": "Acme is great", "brand_mentioned": true,
                 "other_brands_detected": ["Globex"]},
                {"question": "best crm?", "provider": "gemini", "model": "gemini-2.5-flash",
                 "response_text": "Try Globex", "brand_mentioned": false,
                 "other_brands_detected": ["Globex"]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let orch = RunOrchestrator::new(
        test_client(&server.uri()),
        OrchestratorOptions::with_poll_interval_ms(10),
    );
    let mut providers = ProviderSet::new(Provider::Openai);
    providers.insert(Provider::Gemini);
    let config = RunConfig::new("Acme", providers, parse_queries("best crm?"));

    orch.submit(&config).await.expect("submit should succeed");
    let snap = orch.wait_for_terminal().await.expect("run should finish");

    assert_eq!(snap.phase, RunPhase::Completed);
    let results = snap.results.expect("results should be stored");
    assert_eq!(results.results.len(), 2);
    let competitors = geotrack_core::competitor_frequency(&results.results);
    assert_eq!(competitors[0].name, "Globex");
    assert!((competitors[0].visibility_pct - 100.0).abs() < f64::EPSILON);

    // Give a stray tick the chance to show up before the expectations are verified.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    server.verify().await;
}

#[tokio::test]
async fn purged_job_with_failed_results_is_degraded_success() {
    let server = MockServer::start().await;
    mount_start(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/runs/job-42/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(status_body("completed", 2)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/runs/job-42/results"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Job not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let orch = RunOrchestrator::new(
        test_client(&server.uri()),
        OrchestratorOptions::with_poll_interval_ms(10),
    );
    let config = RunConfig::new(
        "Acme",
        ProviderSet::new(Provider::Openai),
        parse_queries("best crm?"),
    );

    orch.submit(&config).await.expect("submit should succeed");
    let snap = orch.wait_for_terminal().await.expect("run should finish");

    assert_eq!(snap.phase, RunPhase::Completed);
    assert!(snap.is_degraded());
    assert!(snap.error.is_none());
}

#[tokio::test]
async fn missing_job_during_polling_fails_with_backend_detail() {
    let server = MockServer::start().await;
    mount_start(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/runs/job-42/status"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Job not found"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let orch = RunOrchestrator::new(
        test_client(&server.uri()),
        OrchestratorOptions::with_poll_interval_ms(10),
    );
    let config = RunConfig::new(
        "Acme",
        ProviderSet::new(Provider::Openai),
        parse_queries("best crm?"),
    );

    orch.submit(&config).await.expect("submit should succeed");
    let snap = orch.wait_for_terminal().await.expect("run should finish");

    assert_eq!(snap.phase, RunPhase::Failed);
    assert_eq!(snap.error.as_deref(), Some("Job not found"));
    assert!(snap.results.is_none());

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    server.verify().await;
}
