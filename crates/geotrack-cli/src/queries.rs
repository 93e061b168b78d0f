//! `queries` subcommands: build, generate, and import question lists.
//!
//! Plain output is one question per line so it can be redirected into a file
//! and passed back to `geotrack run --queries-file`.

use std::io::Read as _;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use geotrack_api::{ApiClient, QueryGenerationRequest};
use geotrack_core::profile::MAX_QUESTION_COUNT;
use geotrack_core::{
    parse_queries, queries_from_questions, sample_queries_for_industry, GeneratedQueries, Query,
    RunConfig,
};

use crate::output::print_json;

/// Sub-commands available under `queries`.
#[derive(Debug, Subcommand)]
pub enum QueriesCommands {
    /// Normalize a question list (one per line, "-" for stdin)
    Parse {
        /// File to read
        file: PathBuf,
    },
    /// Print the built-in sample questions for an industry
    Sample {
        /// Industry, e.g. "Software" or "Healthcare"
        #[arg(long, default_value = "")]
        industry: String,
        /// Question language (de, en, fr, es, it)
        #[arg(long, default_value = RunConfig::DEFAULT_LANGUAGE)]
        lang: String,
    },
    /// Ask the backend to generate questions for a brand
    Generate {
        /// Company or brand name
        #[arg(long)]
        brand: String,
        #[arg(long, default_value = "")]
        industry: String,
        /// What the business does; improves generated questions
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = RunConfig::DEFAULT_LANGUAGE)]
        lang: String,
        /// Target market code (e.g., DE, US)
        #[arg(long, default_value = RunConfig::DEFAULT_MARKET)]
        market: String,
        /// Number of questions to generate
        #[arg(long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_QUESTION_COUNT)))]
        count: u32,
    },
    /// Import prompts from a Google Sheet
    Import {
        /// Sheet URL
        url: String,
        /// Worksheet name (defaults to the first sheet)
        #[arg(long)]
        worksheet: Option<String>,
        /// Bypass the backend's sheet cache
        #[arg(long)]
        refresh: bool,
    },
    /// Check that a Google Sheet is readable before importing it
    Validate {
        /// Sheet URL
        url: String,
    },
}

/// Reads a whole text file, or stdin when `path` is `-`.
pub(crate) fn read_text(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("reading queries from {}: {e}", path.display()))
}

/// Sample questions for `industry`, capped at `count`, with fresh ids.
pub(crate) fn sample_queries(industry: &str, language: &str, count: usize) -> Vec<Query> {
    queries_from_questions(
        sample_queries_for_industry(industry, language)
            .iter()
            .take(count),
    )
}

/// Generates questions, falling back to the built-in samples when the
/// generator is unreachable or errors.
pub(crate) async fn generate_with_fallback(
    client: &ApiClient,
    request: &QueryGenerationRequest,
) -> GeneratedQueries {
    match client.generate_queries(request).await {
        Ok(generated) if !generated.queries.is_empty() => generated,
        Ok(_) => {
            tracing::warn!("query generator returned no questions; using sample questions");
            sample_fallback(request)
        }
        Err(e) => {
            tracing::warn!(error = %e, "query generation failed; using sample questions");
            sample_fallback(request)
        }
    }
}

fn sample_fallback(request: &QueryGenerationRequest) -> GeneratedQueries {
    let count = usize::try_from(request.count).unwrap_or(usize::MAX);
    GeneratedQueries {
        queries: sample_queries(&request.industry, &request.language, count),
        generated_by: Some("fallback".to_string()),
    }
}

fn print_queries(queries: &[Query], json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(queries);
    }
    for query in queries {
        println!("{}", query.question);
    }
    Ok(())
}

pub(crate) fn run_queries_parse(file: &Path, json: bool) -> anyhow::Result<()> {
    let queries = parse_queries(&read_text(file)?);
    if queries.is_empty() {
        anyhow::bail!("no questions found in {}", file.display());
    }
    print_queries(&queries, json)
}

pub(crate) fn run_queries_sample(industry: &str, lang: &str, json: bool) -> anyhow::Result<()> {
    print_queries(&sample_queries(industry, lang, usize::MAX), json)
}

pub(crate) async fn run_queries_generate(
    client: &ApiClient,
    request: &QueryGenerationRequest,
    json: bool,
) -> anyhow::Result<()> {
    let generated = generate_with_fallback(client, request).await;
    if json {
        return print_json(&generated);
    }
    if generated.is_fallback() {
        eprintln!("note: using template questions; the AI generator was unavailable");
    }
    print_queries(&generated.queries, false)
}

pub(crate) async fn run_queries_import(
    client: &ApiClient,
    url: &str,
    worksheet: Option<&str>,
    refresh: bool,
    json: bool,
) -> anyhow::Result<()> {
    let import = client.import_sheet(url, worksheet, refresh).await?;
    if json {
        return print_json(&import);
    }
    eprintln!(
        "imported {} prompts from \"{}\"{}",
        import.prompts.len(),
        import.sheet_title,
        if import.cached { " (cached)" } else { "" }
    );
    print_queries(&import.prompts, false)
}

pub(crate) async fn run_queries_validate(
    client: &ApiClient,
    url: &str,
    json: bool,
) -> anyhow::Result<()> {
    let validation = client.validate_sheet(url).await?;
    if json {
        return print_json(&validation);
    }
    if !validation.valid {
        anyhow::bail!(
            "sheet is not usable: {}",
            validation.error.as_deref().unwrap_or("unknown error")
        );
    }
    println!(
        "sheet \"{}\" is readable",
        validation.sheet_title.as_deref().unwrap_or("untitled")
    );
    if let Some(total) = validation.total_prompts {
        println!("prompts: {total}");
    }
    if !validation.columns.is_empty() {
        println!("columns: {}", validation.columns.join(", "));
    }
    Ok(())
}
