//! Table and progress rendering shared by the command handlers.

use std::fmt::Write as _;

use geotrack_core::format::{
    format_duration, format_percent, format_timestamp, sentiment_label, truncate_text,
};
use geotrack_core::{
    competitor_frequency, filter_by_provider, providers_present, source_domain_frequency,
    ProviderFilter, QueryResult, RunProgress, RunResults, RunSummary,
};
use serde::Serialize;

const QUESTION_WIDTH: usize = 48;
const RESPONSE_WIDTH: usize = 160;

fn fmt_score(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Prints `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One-line progress report, e.g. `[ 50.0%] 2/4 done, 0 failed  running  openai ...`.
pub(crate) fn progress_line(progress: &RunProgress) -> String {
    let mut line = format!(
        "[{:>5.1}%] {}/{} done, {} failed  {}",
        progress.progress_percent,
        progress.completed_tasks,
        progress.total_tasks,
        progress.failed_tasks,
        progress.status
    );
    if let Some(provider) = &progress.current_provider {
        let _ = write!(line, "  {provider}");
    }
    if let Some(query) = &progress.current_query {
        let _ = write!(line, "  \"{}\"", truncate_text(query, QUESTION_WIDTH));
    }
    if progress.estimated_remaining_seconds.is_some() {
        let _ = write!(
            line,
            "  eta {}",
            format_duration(progress.estimated_remaining_seconds)
        );
    }
    line
}

pub(crate) fn print_summary(summary: &RunSummary) {
    println!("Brand:       {}", summary.brand_name);
    println!("Run:         {} ({})", summary.run_id, summary.status);
    println!(
        "Queries:     {} ({} responses)",
        summary.total_queries, summary.total_responses
    );
    println!(
        "Visibility:  {}",
        format_percent(Some(summary.overall_visibility))
    );
    println!(
        "Sentiment:   {} ({})",
        fmt_score(summary.avg_sentiment),
        sentiment_label(summary.avg_sentiment)
    );
    println!("Trust:       {}", fmt_score(summary.avg_trust_authority));
    println!("Duration:    {}", format_duration(summary.duration_seconds));
    println!("Completed:   {}", format_timestamp(summary.completed_at.as_deref()));

    if !summary.provider_visibility.is_empty() {
        println!();
        println!("{:<14}VISIBILITY", "PROVIDER");
        for (provider, pct) in &summary.provider_visibility {
            println!("{:<14}{}", provider, format_percent(Some(*pct)));
        }
    }
}

pub(crate) fn print_competitors(results: &[QueryResult]) {
    let stats = competitor_frequency(results);
    if stats.is_empty() {
        println!("no competitor brands detected");
        return;
    }
    println!("{:<32}{:>7}  VISIBILITY", "COMPETITOR", "COUNT");
    for stat in &stats {
        println!(
            "{:<32}{:>7}  {}",
            truncate_text(&stat.name, 30),
            stat.count,
            format_percent(Some(stat.visibility_pct))
        );
    }
}

pub(crate) fn print_sources(results: &[QueryResult]) {
    let stats = source_domain_frequency(results);
    if stats.is_empty() {
        println!("no sources cited");
        return;
    }
    println!("{:<36}{:>7}  SAMPLE", "DOMAIN", "COUNT");
    for stat in &stats {
        let sample = stat.sample_urls.first().map_or("", String::as_str);
        println!(
            "{:<36}{:>7}  {}",
            truncate_text(&stat.domain, 34),
            stat.count,
            truncate_text(sample, 60)
        );
    }
}

/// Per-response table. With `full`, each row is followed by the response text.
pub(crate) fn print_result_rows(results: &[QueryResult], filter: &ProviderFilter, full: bool) {
    let rows = filter_by_provider(results, filter);
    if rows.is_empty() {
        let available = providers_present(results).join(", ");
        println!("no results for this provider (available: {available})");
        return;
    }
    println!(
        "{:<12}{:<9}{:<10}{:<8}QUESTION",
        "PROVIDER", "BRAND", "SENTIMENT", "SOURCES"
    );
    for result in rows {
        println!(
            "{:<12}{:<9}{:<10}{:<8}{}",
            result.provider,
            if result.brand_mentioned { "yes" } else { "no" },
            sentiment_label(result.sentiment),
            result.sources.len(),
            truncate_text(&result.question, QUESTION_WIDTH)
        );
        if full {
            println!("    {}", truncate_text(result.response_text.trim(), RESPONSE_WIDTH));
            if !result.other_brands_detected.is_empty() {
                println!("    competitors: {}", result.other_brands_detected.join(", "));
            }
        }
    }
}

/// Full report for a completed run: summary, competitor and source tables,
/// then the per-response rows.
pub(crate) fn print_run_results(results: &RunResults, filter: &ProviderFilter, full: bool) {
    print_summary(&results.summary);
    println!();
    print_competitors(&results.results);
    println!();
    print_sources(&results.results);
    println!();
    print_result_rows(&results.results, filter, full);
}
