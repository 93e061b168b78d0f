use geotrack_core::{LeadStatus, Provider};

use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["geotrack"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
    assert!(!cli.json);
}

#[test]
fn cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn parses_health_command() {
    let cli = Cli::try_parse_from(["geotrack", "health"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::Health)));
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["geotrack", "history", "--json", "--limit", "5"])
        .expect("expected valid cli args");
    assert!(cli.json);
    assert!(matches!(cli.command, Some(Commands::History { limit: 5 })));
}

#[test]
fn history_limit_defaults_to_twenty() {
    let cli = Cli::try_parse_from(["geotrack", "history"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::History { limit: 20 })));
}

#[test]
fn parses_run_with_repeated_providers_and_queries() {
    let cli = Cli::try_parse_from([
        "geotrack",
        "run",
        "--brand",
        "Acme",
        "--provider",
        "openai",
        "--provider",
        "perplexity",
        "--query",
        "best crm?",
        "--query",
        "cheapest crm?",
        "--mode",
        "internal",
    ])
    .expect("expected valid cli args");

    let Some(Commands::Run(args)) = cli.command else {
        panic!("expected run command");
    };
    assert_eq!(args.brand.as_deref(), Some("Acme"));
    assert_eq!(args.providers, vec![Provider::Openai, Provider::Perplexity]);
    assert_eq!(args.query.len(), 2);
    assert_eq!(args.mode, Some(geotrack_core::Mode::Internal));
    assert_eq!(args.show_provider, ProviderFilter::All);
    assert!(!args.detach);
}

#[test]
fn run_rejects_unknown_provider() {
    let result = Cli::try_parse_from(["geotrack", "run", "--provider", "mistral"]);
    assert!(result.is_err());
}

#[test]
fn run_rejects_two_query_sources() {
    let result = Cli::try_parse_from([
        "geotrack",
        "run",
        "--queries-file",
        "q.txt",
        "--generate",
    ]);
    assert!(result.is_err());
}

#[test]
fn parses_results_with_provider_filter() {
    let cli = Cli::try_parse_from(["geotrack", "results", "job-1", "--provider", "gemini"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Results {
            job_id,
            provider,
            full,
        }) => {
            assert_eq!(job_id, "job-1");
            assert_eq!(provider, ProviderFilter::Only("gemini".to_string()));
            assert!(!full);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_queries_generate_defaults() {
    let cli = Cli::try_parse_from(["geotrack", "queries", "generate", "--brand", "Acme"])
        .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Queries {
            command:
                QueriesCommands::Generate {
                    brand,
                    lang,
                    market,
                    count,
                    ..
                },
        }) => {
            assert_eq!(brand, "Acme");
            assert_eq!(lang, "de");
            assert_eq!(market, "DE");
            assert_eq!(count, 15);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn queries_generate_rejects_out_of_range_count() {
    let result = Cli::try_parse_from([
        "geotrack", "queries", "generate", "--brand", "Acme", "--count", "101",
    ]);
    assert!(result.is_err());
}

#[test]
fn report_force_conflicts_with_cached_only() {
    let result = Cli::try_parse_from(["geotrack", "report", "job-1", "--force", "--cached-only"]);
    assert!(result.is_err());

    let cli = Cli::try_parse_from(["geotrack", "report", "job-1"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Report {
            force: false,
            cached_only: false,
            ..
        })
    ));
}

#[test]
fn parses_brands_show_by_name() {
    let cli = Cli::try_parse_from(["geotrack", "brands", "show", "Acme Corp"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Brands {
            command: BrandsCommands::Show { ref brand, limit: 20 }
        }) if brand == "Acme Corp"
    ));
}

#[test]
fn parses_session_logout() {
    let cli = Cli::try_parse_from(["geotrack", "session", "logout"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Session {
            command: SessionCommands::Logout
        })
    ));
}

#[test]
fn parses_leads_update() {
    let cli = Cli::try_parse_from([
        "geotrack",
        "leads",
        "update",
        "7",
        "--status",
        "qualified",
        "--notes",
        "call back monday",
    ])
    .expect("expected valid cli args");
    match cli.command {
        Some(Commands::Leads {
            command: LeadsCommands::Update { id, status, notes },
        }) => {
            assert_eq!(id, 7);
            assert_eq!(status, LeadStatus::Qualified);
            assert_eq!(notes.as_deref(), Some("call back monday"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn leads_update_requires_status() {
    let result = Cli::try_parse_from(["geotrack", "leads", "update", "7"]);
    assert!(result.is_err());
}
