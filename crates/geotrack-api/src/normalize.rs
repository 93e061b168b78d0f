//! Normalization of backend wire types into `geotrack-core` domain types.

use geotrack_core::{
    queries_from_questions, GeneratedQueries, Query, QueryResult, RunHandle, RunProgress,
    RunResults, RunStatus, RunSummary, SheetImport, Source,
};

use crate::types::{
    GenerateQueriesResponse, JobCreatedResponse, RawQuery, RawQueryResult, RawRunSummary,
    RawSource, RunResultsResponse, RunStatusResponse, SheetPromptsResponse,
};

/// Converts the start-run response. A missing `run_id` falls back to the job id.
#[must_use]
pub fn normalize_handle(raw: JobCreatedResponse) -> RunHandle {
    RunHandle {
        run_id: raw.run_id.unwrap_or_else(|| raw.job_id.clone()),
        job_id: raw.job_id,
        status: raw.status.unwrap_or(RunStatus::Pending),
        message: raw.message,
        estimated_duration_seconds: raw.estimated_duration_seconds,
    }
}

#[must_use]
pub fn normalize_progress(raw: RunStatusResponse) -> RunProgress {
    RunProgress {
        run_id: raw.run_id.unwrap_or_default(),
        status: raw.status,
        total_tasks: raw.total_tasks.unwrap_or(0),
        completed_tasks: raw.completed_tasks.unwrap_or(0),
        failed_tasks: raw.failed_tasks.unwrap_or(0),
        progress_percent: raw.progress_percent.unwrap_or(0.0),
        current_provider: raw.current_provider,
        current_query: raw.current_query,
        estimated_remaining_seconds: raw.estimated_remaining_seconds,
        started_at: raw.started_at,
        updated_at: raw.updated_at,
        error: raw.error,
    }
}

/// Converts a results body, defaulting absent lists and maps to empty.
#[must_use]
pub fn normalize_results(raw: RunResultsResponse) -> RunResults {
    RunResults {
        summary: normalize_summary(raw.summary),
        results: raw
            .results
            .unwrap_or_default()
            .into_iter()
            .map(normalize_query_result)
            .collect(),
    }
}

fn normalize_summary(raw: RawRunSummary) -> RunSummary {
    RunSummary {
        run_id: raw.run_id.unwrap_or_default(),
        company_id: raw.company_id.unwrap_or_default(),
        brand_name: raw.brand_name.unwrap_or_default(),
        status: raw.status.unwrap_or(RunStatus::Completed),
        total_queries: raw.total_queries.unwrap_or(0),
        total_responses: raw.total_responses.unwrap_or(0),
        overall_visibility: raw.overall_visibility.unwrap_or(0.0),
        avg_sentiment: raw.avg_sentiment,
        avg_trust_authority: raw.avg_trust_authority,
        provider_visibility: raw.provider_visibility.unwrap_or_default(),
        competitor_visibility: raw.competitor_visibility.unwrap_or_default(),
        started_at: raw.started_at,
        completed_at: raw.completed_at,
        duration_seconds: raw.duration_seconds,
    }
}

fn normalize_source(raw: RawSource) -> Source {
    match raw {
        RawSource::Url(url) => Source { url, title: None },
        RawSource::Object { url, title } => Source { url, title },
    }
}

fn normalize_query_result(raw: RawQueryResult) -> QueryResult {
    QueryResult {
        prompt_id: raw.prompt_id,
        category: raw.category,
        question: raw.question.unwrap_or_default(),
        provider: raw.provider.unwrap_or_default(),
        model: raw.model.unwrap_or_default(),
        mode: raw.mode,
        response_text: raw.response_text.unwrap_or_default(),
        brand_mentioned: raw.brand_mentioned.unwrap_or(false),
        sentiment: raw.sentiment,
        trust_authority: raw.trust_authority,
        presence: raw.presence,
        other_brands_detected: raw.other_brands_detected.unwrap_or_default(),
        sources: raw
            .sources
            .unwrap_or_default()
            .into_iter()
            .map(normalize_source)
            .collect(),
        latency_ms: raw.latency_ms,
        tokens_in: raw.tokens_in,
        tokens_out: raw.tokens_out,
        timestamp: raw.timestamp,
    }
}

/// Converts imported prompts, keeping the sheet's ids and categories.
///
/// Prompts without a question are dropped; missing ids become `q_<n>` by
/// position among the kept prompts.
#[must_use]
pub fn normalize_prompts(raw: Vec<RawQuery>) -> Vec<Query> {
    raw.into_iter()
        .filter_map(|q| {
            let question = q.question?.trim().to_string();
            (!question.is_empty()).then_some((question, q.category, q.prompt_id))
        })
        .enumerate()
        .map(|(index, (question, category, prompt_id))| Query {
            question,
            category,
            prompt_id: prompt_id
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| format!("q_{}", index + 1)),
        })
        .collect()
}

/// Generated questions are re-parsed like typed text: fresh `q_<n>` ids and
/// the `custom` category.
#[must_use]
pub fn normalize_generated(raw: GenerateQueriesResponse) -> GeneratedQueries {
    let questions = raw
        .queries
        .unwrap_or_default()
        .into_iter()
        .filter_map(|q| q.question);
    GeneratedQueries {
        queries: queries_from_questions(questions),
        generated_by: raw.generated_by,
    }
}

#[must_use]
pub fn normalize_sheet(raw: SheetPromptsResponse) -> SheetImport {
    let prompts = normalize_prompts(raw.prompts.unwrap_or_default());
    let columns = raw.columns_detected.unwrap_or_default();
    SheetImport {
        total_count: raw
            .total_count
            .unwrap_or_else(|| u32::try_from(prompts.len()).unwrap_or(u32::MAX)),
        prompts,
        question_column: columns.question,
        category_column: columns.category,
        all_columns: raw.all_columns.unwrap_or_default(),
        cached: raw.cached,
        sheet_title: raw.sheet_title.unwrap_or_default(),
        sheet_id: raw.sheet_id.unwrap_or_default(),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
