//! Run lifecycle commands: start and follow a run, inspect, cancel, list.

use std::path::PathBuf;

use clap::Args;
use geotrack_api::{ApiClient, QueryGenerationRequest};
use geotrack_core::format::{format_percent, format_timestamp, truncate_text};
use geotrack_core::{
    load_profile, parse_queries, queries_from_questions, BrandProfile, Mode, Provider,
    ProviderFilter, ProviderSet, Query, RunConfig,
};
use geotrack_runner::{OrchestratorOptions, RunOrchestrator, RunPhase, RunSnapshot};
use tokio::sync::mpsc;

use crate::output::{print_json, print_run_results, progress_line};
use crate::queries::{generate_with_fallback, read_text, sample_queries};

/// Options for `geotrack run`.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// Brand profile YAML to start from; flags below override it
    #[arg(long)]
    pub profile: Option<PathBuf>,
    /// Brand to track (required unless the profile sets it)
    #[arg(long)]
    pub brand: Option<String>,
    #[arg(long)]
    pub industry: Option<String>,
    #[arg(long)]
    pub company_id: Option<String>,
    /// Provider to query; repeat for several (default: openai, gemini)
    #[arg(long = "provider", value_name = "PROVIDER")]
    pub providers: Vec<Provider>,
    /// Model override, e.g. openai=gpt-4.1; repeatable
    #[arg(long = "model", value_name = "PROVIDER=MODEL", value_parser = parse_model_override)]
    pub models: Vec<(Provider, String)>,
    /// internal or provider_web
    #[arg(long)]
    pub mode: Option<Mode>,
    /// Market code (e.g., DE, US)
    #[arg(long)]
    pub market: Option<String>,
    #[arg(long)]
    pub lang: Option<String>,
    /// File with one question per line ("-" for stdin)
    #[arg(long, group = "source")]
    pub queries_file: Option<PathBuf>,
    /// Question to ask; repeatable
    #[arg(long = "query", value_name = "QUESTION", group = "source")]
    pub query: Vec<String>,
    /// Use the built-in sample questions for the industry
    #[arg(long, group = "source")]
    pub sample: bool,
    /// Import the questions from a Google Sheet
    #[arg(long, value_name = "URL", group = "source")]
    pub sheet: Option<String>,
    /// Let the backend generate questions from the profile
    #[arg(long, group = "source")]
    pub generate: bool,
    /// Keep raw provider payloads on the server
    #[arg(long)]
    pub raw: bool,
    /// Per-request provider timeout in seconds
    #[arg(long)]
    pub timeout: Option<u32>,
    #[arg(long)]
    pub max_retries: Option<u32>,
    /// Delay between queries in milliseconds
    #[arg(long)]
    pub sleep_ms: Option<u64>,
    /// Print the job id and exit without following the run
    #[arg(long)]
    pub detach: bool,
    /// Only list results from this provider ("all" for every provider)
    #[arg(long, default_value = "all")]
    pub show_provider: ProviderFilter,
    /// Print each response under its row
    #[arg(long)]
    pub full: bool,
}

/// Parses `PROVIDER=MODEL`.
pub(crate) fn parse_model_override(raw: &str) -> Result<(Provider, String), String> {
    let (provider, model) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PROVIDER=MODEL, got '{raw}'"))?;
    let model = model.trim();
    if model.is_empty() {
        return Err(format!("model for '{provider}' must not be empty"));
    }
    Ok((provider.parse()?, model.to_string()))
}

/// Applies command-line overrides on top of a profile.
pub(crate) fn apply_overrides(profile: &mut BrandProfile, args: &RunArgs) -> anyhow::Result<()> {
    if let Some(brand) = &args.brand {
        profile.brand_name.clone_from(brand);
    }
    if let Some(industry) = &args.industry {
        profile.industry.clone_from(industry);
    }
    if let Some(company_id) = &args.company_id {
        profile.company_id.clone_from(company_id);
    }
    if !args.providers.is_empty() {
        profile.providers = ProviderSet::try_from(args.providers.clone())?;
    }
    for (provider, model) in &args.models {
        profile.models.insert(*provider, model.clone());
    }
    if let Some(mode) = args.mode {
        profile.mode = mode;
    }
    if let Some(market) = &args.market {
        profile.market.clone_from(market);
    }
    if let Some(lang) = &args.lang {
        profile.language.clone_from(lang);
    }
    if args.raw {
        profile.raw = true;
    }
    if args.timeout.is_some() {
        profile.timeout_seconds = args.timeout;
    }
    if args.max_retries.is_some() {
        profile.max_retries = args.max_retries;
    }
    if args.sleep_ms.is_some() {
        profile.inter_query_delay_ms = args.sleep_ms;
    }
    Ok(())
}

async fn resolve_queries(
    client: &ApiClient,
    profile: &BrandProfile,
    args: &RunArgs,
) -> anyhow::Result<Vec<Query>> {
    if let Some(path) = &args.queries_file {
        return Ok(parse_queries(&read_text(path)?));
    }
    if !args.query.is_empty() {
        return Ok(queries_from_questions(&args.query));
    }
    if args.sample {
        return Ok(sample_queries(
            &profile.industry,
            &profile.language,
            usize::MAX,
        ));
    }
    if let Some(url) = &args.sheet {
        return Ok(client.import_sheet(url, None, false).await?.prompts);
    }
    if args.generate {
        let request = QueryGenerationRequest {
            company_name: profile.brand_name.clone(),
            industry: profile.industry.clone(),
            description: profile.description.clone(),
            language: profile.language.clone(),
            count: profile.question_count,
            market: profile.market.clone(),
        };
        let generated = generate_with_fallback(client, &request).await;
        if generated.is_fallback() {
            eprintln!("note: using template questions; the AI generator was unavailable");
        }
        return Ok(generated.queries);
    }
    Ok(Vec::new())
}

async fn build_run_config(client: &ApiClient, args: &RunArgs) -> anyhow::Result<RunConfig> {
    let mut profile = match &args.profile {
        Some(path) => load_profile(path)?,
        None => BrandProfile::new(""),
    };
    apply_overrides(&mut profile, args)?;
    let queries = resolve_queries(client, &profile, args).await?;
    Ok(profile.to_run_config(queries))
}

/// Prints a progress line when anything visible changed since the last one.
fn report_progress(snapshot: &RunSnapshot, last_line: &mut String) {
    let Some(progress) = &snapshot.progress else {
        return;
    };
    let line = progress_line(progress);
    if line != *last_line {
        eprintln!("{line}");
        *last_line = line;
    }
}

/// Forwards every Ctrl-C into `tx` until the receiver goes away.
fn forward_interrupts(tx: mpsc::Sender<()>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while tokio::signal::ctrl_c().await.is_ok() {
            if tx.send(()).await.is_err() {
                break;
            }
        }
    })
}

/// Follows the run until it reaches a terminal phase.
///
/// The first interrupt asks the server to cancel and keeps polling until the
/// server confirms. A second one stops following: the orchestrator is reset
/// and the job is left to the backend.
async fn follow_run<B: geotrack_runner::RunBackend>(
    orch: &RunOrchestrator<B>,
    interrupts: &mut mpsc::Receiver<()>,
) -> anyhow::Result<RunSnapshot> {
    let mut rx = orch.subscribe();
    let mut last_line = String::new();
    let mut interrupted = 0_u32;

    loop {
        let snapshot = rx.borrow_and_update().clone();
        report_progress(&snapshot, &mut last_line);
        if snapshot.phase.is_terminal() {
            return Ok(snapshot);
        }
        if snapshot.phase == RunPhase::Idle {
            anyhow::bail!(snapshot.error.unwrap_or_else(|| "run was reset".to_string()));
        }

        tokio::select! {
            changed = rx.changed() => changed?,
            Some(()) = interrupts.recv() => {
                interrupted += 1;
                if interrupted > 1 {
                    let job_id = snapshot
                        .handle
                        .map_or_else(|| "?".to_string(), |handle| handle.job_id);
                    orch.reset();
                    tracing::warn!(job_id = %job_id, "stopped following run");
                    anyhow::bail!("interrupted; job {job_id} may still be running");
                }
                match orch.cancel().await {
                    Ok(message) => {
                        eprintln!("cancel requested: {message} (Ctrl-C again to stop waiting)");
                    }
                    Err(e) => eprintln!("cancel request failed: {e}"),
                }
            }
        }
    }
}

/// `geotrack run`: submit a run and follow it to the end.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, submission fails, or the
/// run ends failed or cancelled.
pub(crate) async fn run_visibility(
    client: &ApiClient,
    poll_interval_ms: u64,
    args: &RunArgs,
    json: bool,
) -> anyhow::Result<()> {
    let config = build_run_config(client, args).await?;
    tracing::info!(
        brand = %config.brand_name,
        queries = config.queries.len(),
        providers = config.providers.len(),
        mode = %config.mode,
        "submitting run"
    );

    let orch = RunOrchestrator::new(
        client.clone(),
        OrchestratorOptions::with_poll_interval_ms(poll_interval_ms),
    );
    let handle = orch.submit(&config).await?;
    eprintln!("submitted job {} (run {})", handle.job_id, handle.run_id);

    if args.detach {
        if json {
            return print_json(&handle);
        }
        println!("{}", handle.job_id);
        return Ok(());
    }

    let (interrupt_tx, mut interrupts) = mpsc::channel(2);
    let forwarder = forward_interrupts(interrupt_tx);
    let followed = follow_run(&orch, &mut interrupts).await;
    forwarder.abort();
    let snapshot = followed?;
    match (snapshot.phase, snapshot.results) {
        (RunPhase::Completed, Some(results)) => {
            if json {
                print_json(&*results)
            } else {
                print_run_results(&results, &args.show_provider, args.full);
                Ok(())
            }
        }
        (RunPhase::Completed, None) => {
            eprintln!(
                "run completed without detailed results; retry with `geotrack results {}`",
                handle.job_id
            );
            Ok(())
        }
        (phase, _) => anyhow::bail!(snapshot
            .error
            .unwrap_or_else(|| format!("Run {phase}"))),
    }
}

pub(crate) async fn run_status(client: &ApiClient, job_id: &str, json: bool) -> anyhow::Result<()> {
    let progress = client.run_status(job_id).await?;
    if json {
        return print_json(&progress);
    }
    println!("{}", progress_line(&progress));
    println!("Started:  {}", format_timestamp(progress.started_at.as_deref()));
    println!("Updated:  {}", format_timestamp(progress.updated_at.as_deref()));
    if let Some(message) = progress.failure_message() {
        println!("{message}");
    }
    Ok(())
}

/// `geotrack results`: shows a previous run the same way a finished one is shown.
pub(crate) async fn run_results(
    client: &ApiClient,
    job_id: &str,
    filter: &ProviderFilter,
    full: bool,
    json: bool,
) -> anyhow::Result<()> {
    let orch = RunOrchestrator::new(client.clone(), OrchestratorOptions::default());
    let results = orch.load_previous(job_id).await?;
    if json {
        return print_json(&*results);
    }
    print_run_results(&results, filter, full);
    Ok(())
}

pub(crate) async fn run_cancel(client: &ApiClient, job_id: &str) -> anyhow::Result<()> {
    let message = client.cancel_run(job_id).await?;
    println!("{message}");
    Ok(())
}

pub(crate) async fn run_history(client: &ApiClient, limit: u32, json: bool) -> anyhow::Result<()> {
    let runs = client.list_runs(limit).await?;
    if json {
        return print_json(&runs);
    }
    if runs.is_empty() {
        println!("no runs found");
        return Ok(());
    }

    println!(
        "{:<38}{:<20}{:<24}{:>8}{:>11}  PROVIDERS",
        "JOB", "WHEN", "BRAND", "QUERIES", "VISIBILITY"
    );
    for run in &runs {
        println!(
            "{:<38}{:<20}{:<24}{:>8}{:>11}  {}",
            run.job_id.as_deref().unwrap_or("-"),
            format_timestamp(run.run_ts.as_deref()),
            truncate_text(run.brand_name.as_deref().unwrap_or("-"), 22),
            run.total_queries,
            format_percent(run.visibility_pct),
            run.providers.join(",")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        args: RunArgs,
    }

    fn args(extra: &[&str]) -> RunArgs {
        let mut argv = vec!["run"];
        argv.extend_from_slice(extra);
        Harness::try_parse_from(argv).expect("valid run args").args
    }

    #[test]
    fn model_override_requires_provider_and_model() {
        assert_eq!(
            parse_model_override("gemini=gemini-2.5-pro").unwrap(),
            (Provider::Gemini, "gemini-2.5-pro".to_string())
        );
        assert!(parse_model_override("gemini").is_err());
        assert!(parse_model_override("gemini=").is_err());
        assert!(parse_model_override("mistral=large").is_err());
    }

    #[test]
    fn flags_override_profile_values() {
        let mut profile = BrandProfile::new("Profile Brand");
        profile.market = "US".to_string();
        let args = args(&[
            "--brand",
            "Acme",
            "--provider",
            "perplexity",
            "--provider",
            "anthropic",
            "--model",
            "anthropic=claude-opus-4-1",
            "--timeout",
            "90",
        ]);

        apply_overrides(&mut profile, &args).unwrap();
        let config = profile.to_run_config(parse_queries("q"));

        assert_eq!(config.brand_name, "Acme");
        assert_eq!(
            config.providers.as_slice(),
            &[Provider::Perplexity, Provider::Anthropic]
        );
        assert_eq!(config.model_for(Provider::Anthropic), "claude-opus-4-1");
        assert_eq!(config.model_for(Provider::Perplexity), "sonar");
        assert_eq!(config.market, "US");
        assert_eq!(config.timeout_seconds, 90);
    }

    #[test]
    fn unset_flags_keep_profile_values() {
        let mut profile = BrandProfile::new("Acme");
        profile.timeout_seconds = Some(45);
        apply_overrides(&mut profile, &args(&[])).unwrap();
        assert_eq!(profile.brand_name, "Acme");
        assert_eq!(profile.timeout_seconds, Some(45));
        assert_eq!(profile.providers.len(), 2);
    }

    #[test]
    fn query_sources_are_mutually_exclusive() {
        let mut argv = vec!["run", "--sample", "--query", "best crm?"];
        assert!(Harness::try_parse_from(argv.clone()).is_err());
        argv.truncate(2);
        assert!(Harness::try_parse_from(argv.clone()).is_ok());
    }

    mod follow {
        use geotrack_core::parse_queries;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::*;

        fn status_body(status: &str) -> serde_json::Value {
            serde_json::json!({
                "run_id": "run-42",
                "status": status,
                "total_tasks": 2,
                "completed_tasks": 0,
                "failed_tasks": 0,
                "progress_percent": 0.0
            })
        }

        async fn submitted_run(server: &MockServer) -> RunOrchestrator<ApiClient> {
            Mock::given(method("POST"))
                .and(path("/api/runs"))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "job_id": "job-42",
                    "run_id": "run-42",
                    "status": "pending"
                })))
                .mount(server)
                .await;
            Mock::given(method("POST"))
                .and(path("/api/runs/job-42/cancel"))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"message": "Cancellation requested"})),
                )
                .expect(1)
                .mount(server)
                .await;

            let client = ApiClient::new(&server.uri(), 5, "geotrack-test").expect("client");
            let orch = RunOrchestrator::new(client, OrchestratorOptions::with_poll_interval_ms(200));
            let config = RunConfig::new(
                "Acme",
                ProviderSet::new(Provider::Openai),
                parse_queries("best crm?"),
            );
            orch.submit(&config).await.expect("submit should succeed");
            orch
        }

        #[tokio::test]
        async fn one_interrupt_cancels_and_waits_for_the_server() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/runs/job-42/status"))
                .respond_with(ResponseTemplate::new(200).set_body_json(status_body("cancelled")))
                .mount(&server)
                .await;
            let orch = submitted_run(&server).await;

            let (tx, mut interrupts) = mpsc::channel(2);
            tx.send(()).await.unwrap();
            let snapshot = follow_run(&orch, &mut interrupts).await.unwrap();

            assert_eq!(snapshot.phase, RunPhase::Cancelled);
            server.verify().await;
        }

        #[tokio::test]
        async fn second_interrupt_stops_following_and_resets() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/api/runs/job-42/status"))
                .respond_with(ResponseTemplate::new(200).set_body_json(status_body("running")))
                .mount(&server)
                .await;
            let orch = submitted_run(&server).await;

            let (tx, mut interrupts) = mpsc::channel(2);
            tx.send(()).await.unwrap();
            tx.send(()).await.unwrap();
            let err = follow_run(&orch, &mut interrupts).await.unwrap_err();

            assert_eq!(
                err.to_string(),
                "interrupted; job job-42 may still be running"
            );
            assert_eq!(orch.snapshot().phase, RunPhase::Idle);
            server.verify().await;
        }
    }
}
