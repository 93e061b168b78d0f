use super::*;

fn parse<T: serde::de::DeserializeOwned>(json: &str) -> T {
    serde_json::from_str(json).expect("fixture should deserialize")
}

#[test]
fn handle_falls_back_to_job_id_for_run_id() {
    let handle = normalize_handle(parse(r#"{"job_id":"job-9"}"#));
    assert_eq!(handle.job_id, "job-9");
    assert_eq!(handle.run_id, "job-9");
    assert_eq!(handle.status, RunStatus::Pending);
}

#[test]
fn progress_defaults_missing_counters() {
    let progress = normalize_progress(parse(r#"{"run_id":"r1","status":"running"}"#));
    assert_eq!(progress.status, RunStatus::Running);
    assert_eq!(progress.total_tasks, 0);
    assert!((progress.progress_percent - 0.0).abs() < f64::EPSILON);
    assert!(progress.error.is_none());
}

#[test]
fn results_default_absent_lists_and_maps() {
    let results = normalize_results(parse(
        r#"{
            "summary": {
                "run_id": "r1",
                "brand_name": "Acme",
                "status": "completed",
                "overall_visibility": 40.0,
                "provider_visibility": null
            },
            "results": [
                {"question": "best crm?", "provider": "openai", "model": "gpt-4.1-mini",
                 "response_text": "Acme", "brand_mentioned": true,
                 "other_brands_detected": null, "sources": null}
            ]
        }"#,
    ));
    assert!(results.summary.provider_visibility.is_empty());
    assert!(results.summary.competitor_visibility.is_empty());
    assert_eq!(results.results.len(), 1);
    let first = &results.results[0];
    assert!(first.brand_mentioned);
    assert!(first.other_brands_detected.is_empty());
    assert!(first.sources.is_empty());
}

#[test]
fn results_without_results_key_are_empty() {
    let results = normalize_results(parse(r#"{"summary":{"run_id":"r1"}}"#));
    assert!(results.results.is_empty());
    assert_eq!(results.summary.status, RunStatus::Completed);
}

#[test]
fn prompts_keep_sheet_ids_and_fill_missing_ones() {
    let prompts = normalize_prompts(parse(
        r#"[
            {"question": " Which vitamin D? ", "category": "health", "prompt_id": "P-7"},
            {"question": "   "},
            {"question": "Best omega 3?"}
        ]"#,
    ));
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0].question, "Which vitamin D?");
    assert_eq!(prompts[0].prompt_id, "P-7");
    assert_eq!(prompts[0].category.as_deref(), Some("health"));
    assert_eq!(prompts[1].prompt_id, "q_2");
    assert!(prompts[1].category.is_none());
}

#[test]
fn generated_queries_are_reparsed() {
    let generated = normalize_generated(parse(
        r#"{"queries":[{"question":"a?","prompt_id":"gen_1","category":"x"},{"question":"b?"}],
            "generated_by":"fallback"}"#,
    ));
    assert!(generated.is_fallback());
    assert_eq!(generated.queries[0].prompt_id, "q_1");
    assert_eq!(generated.queries[0].category.as_deref(), Some("custom"));
    assert_eq!(generated.queries[1].prompt_id, "q_2");
}

#[test]
fn sheet_import_reads_detected_columns() {
    let sheet = normalize_sheet(parse(
        r#"{"prompts":[{"question":"q1"}],"columns_detected":{"question":"Prompt"},
            "all_columns":["Prompt","Topic"],"cached":true,"sheet_title":"GEO prompts"}"#,
    ));
    assert_eq!(sheet.total_count, 1);
    assert_eq!(sheet.question_column.as_deref(), Some("Prompt"));
    assert!(sheet.category_column.is_none());
    assert!(sheet.cached);
    assert_eq!(sheet.sheet_title, "GEO prompts");
    assert_eq!(sheet.sheet_id, "");
}
