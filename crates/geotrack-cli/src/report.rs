//! `geotrack report`: AI-written visibility analysis for a finished run.

use geotrack_api::{ApiClient, ReportRequest};
use geotrack_core::format::format_timestamp;

use crate::output::print_json;

/// Options for `geotrack report` beyond the job id.
#[derive(Debug, Clone)]
pub(crate) struct ReportOptions {
    pub force: bool,
    pub cached_only: bool,
    pub provider: String,
    pub model: String,
}

/// Shows the stored report for `job_id`, generating one when none exists
/// (or when `force` is set).
///
/// # Errors
///
/// Returns an error if the run's results or the report cannot be fetched.
pub(crate) async fn run_report(
    client: &ApiClient,
    job_id: &str,
    options: &ReportOptions,
    json: bool,
) -> anyhow::Result<()> {
    if !options.force {
        if let Some(report) = client.cached_report(job_id).await? {
            tracing::debug!(job_id, "using cached report");
            return print_report(&report, json);
        }
    }
    if options.cached_only {
        anyhow::bail!("no stored report for job {job_id}");
    }

    let results = client.run_results(job_id).await?;
    let mut request = ReportRequest::new(
        results.summary.brand_name.clone(),
        Some(job_id.to_string()),
    );
    request.provider.clone_from(&options.provider);
    request.model.clone_from(&options.model);
    request.force_regenerate = options.force;

    eprintln!("generating report with {}/{} ...", request.provider, request.model);
    let report = client.generate_report(&request, &results).await?;
    print_report(&report, json)
}

fn print_report(report: &geotrack_core::VisibilityReport, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(report);
    }
    if let Some(error) = &report.error {
        anyhow::bail!("report generation failed: {error}");
    }
    println!("{}", report.report.trim_end());
    println!();
    println!(
        "-- {} {} {}{}",
        report.provider.as_deref().unwrap_or("-"),
        report.model.as_deref().unwrap_or("-"),
        format_timestamp(report.generated_at.as_deref()),
        if report.from_cache { " (cached)" } else { "" }
    );
    Ok(())
}
