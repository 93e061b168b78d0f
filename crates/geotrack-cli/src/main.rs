mod brands;
mod leads;
mod output;
mod queries;
mod report;
mod run;
mod session;

use clap::{CommandFactory, Parser, Subcommand};
use geotrack_api::{QueryGenerationRequest, ReportRequest};
use geotrack_core::{AppConfig, ProviderFilter};
use tracing_subscriber::EnvFilter;

use brands::BrandsCommands;
use leads::LeadsCommands;
use queries::QueriesCommands;
use run::RunArgs;
use session::{Session, SessionCommands};

#[derive(Debug, Parser)]
#[command(name = "geotrack")]
#[command(about = "Measure how often LLM assistants mention your brand")]
struct Cli {
    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Check that the backend is reachable
    Health,
    /// Start a visibility run and follow it until it finishes
    Run(Box<RunArgs>),
    /// Show the server-side progress of a run
    Status {
        /// Job id printed when the run was submitted
        job_id: String,
    },
    /// Show the results of a finished run
    Results {
        job_id: String,
        /// Only list results from this provider ("all" for every provider)
        #[arg(long, default_value = "all")]
        provider: ProviderFilter,
        /// Print each response under its row
        #[arg(long)]
        full: bool,
    },
    /// Ask the backend to cancel a run
    Cancel { job_id: String },
    /// List recent runs across all brands
    History {
        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Build, generate or import question lists
    Queries {
        #[command(subcommand)]
        command: QueriesCommands,
    },
    /// Show or generate the AI analysis of a finished run
    Report {
        job_id: String,
        /// Generate a new report even if one is stored
        #[arg(long, conflicts_with = "cached_only")]
        force: bool,
        /// Only show a stored report; never generate one
        #[arg(long)]
        cached_only: bool,
        #[arg(long, default_value = ReportRequest::DEFAULT_PROVIDER)]
        provider: String,
        #[arg(long, default_value = ReportRequest::DEFAULT_MODEL)]
        model: String,
    },
    /// Tracked brands and their run history
    Brands {
        #[command(subcommand)]
        command: BrandsCommands,
    },
    /// Log in, check, or forget the stored API token
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Manage captured leads (admin only)
    Leads {
        #[command(subcommand)]
        command: LeadsCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = geotrack_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut session = Session::init(&config)?;
    let result = dispatch(command, &mut session, &config, cli.json).await;
    session.teardown();
    result
}

#[allow(clippy::too_many_lines)]
async fn dispatch(
    command: Commands,
    session: &mut Session,
    config: &AppConfig,
    json: bool,
) -> anyhow::Result<()> {
    let client = session.client().clone();
    match command {
        Commands::Health => {
            let health = client.health().await?;
            if json {
                output::print_json(&health)?;
            } else {
                println!("{} {} at {}", health.status, health.version, client.base_url());
                if !health.providers_available.is_empty() {
                    println!("providers: {}", health.providers_available.join(", "));
                }
            }
        }
        Commands::Run(args) => {
            run::run_visibility(&client, config.poll_interval_ms, &args, json).await?;
        }
        Commands::Status { job_id } => run::run_status(&client, &job_id, json).await?,
        Commands::Results {
            job_id,
            provider,
            full,
        } => run::run_results(&client, &job_id, &provider, full, json).await?,
        Commands::Cancel { job_id } => run::run_cancel(&client, &job_id).await?,
        Commands::History { limit } => run::run_history(&client, limit, json).await?,
        Commands::Queries { command } => match command {
            QueriesCommands::Parse { file } => queries::run_queries_parse(&file, json)?,
            QueriesCommands::Sample { industry, lang } => {
                queries::run_queries_sample(&industry, &lang, json)?;
            }
            QueriesCommands::Generate {
                brand,
                industry,
                description,
                lang,
                market,
                count,
            } => {
                let request = QueryGenerationRequest {
                    company_name: brand,
                    industry,
                    description,
                    language: lang,
                    count,
                    market,
                };
                queries::run_queries_generate(&client, &request, json).await?;
            }
            QueriesCommands::Import {
                url,
                worksheet,
                refresh,
            } => {
                queries::run_queries_import(&client, &url, worksheet.as_deref(), refresh, json)
                    .await?;
            }
            QueriesCommands::Validate { url } => {
                queries::run_queries_validate(&client, &url, json).await?;
            }
        },
        Commands::Report {
            job_id,
            force,
            cached_only,
            provider,
            model,
        } => {
            let options = report::ReportOptions {
                force,
                cached_only,
                provider,
                model,
            };
            report::run_report(&client, &job_id, &options, json).await?;
        }
        Commands::Brands { command } => match command {
            BrandsCommands::List { company_id, limit } => {
                brands::run_brands_list(&client, company_id.as_deref(), limit, json).await?;
            }
            BrandsCommands::Show { brand, limit } => {
                brands::run_brands_show(&client, &brand, limit, json).await?;
            }
            BrandsCommands::Delete { id } => brands::run_brands_delete(&client, id).await?,
        },
        Commands::Session { command } => match command {
            SessionCommands::Login { token } => {
                session::run_session_login(session, &token, json).await?;
            }
            SessionCommands::Whoami => session::run_session_whoami(session, json).await?,
            SessionCommands::Logout => session::run_session_logout(session)?,
        },
        Commands::Leads { command } => match command {
            LeadsCommands::List { status } => leads::run_leads_list(session, status, json).await?,
            LeadsCommands::Stats => leads::run_leads_stats(session, json).await?,
            LeadsCommands::Update { id, status, notes } => {
                leads::run_leads_update(session, id, status, notes.as_deref()).await?;
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests;
