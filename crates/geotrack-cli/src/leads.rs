//! Admin lead management. Every command here needs a logged-in user with
//! admin access; without one the command prints where to log in and exits
//! cleanly instead of failing.

use clap::Subcommand;
use geotrack_api::ApiError;
use geotrack_core::format::{format_percent, format_timestamp, truncate_text};
use geotrack_core::LeadStatus;

use crate::output::print_json;
use crate::session::Session;

const LOGIN_HINT: &str = "please log in first: geotrack session login <TOKEN>";

/// Sub-commands available under `leads`.
#[derive(Debug, Subcommand)]
pub enum LeadsCommands {
    /// List captured leads
    List {
        /// Only leads in this stage (new, contacted, qualified, converted, lost)
        #[arg(long)]
        status: Option<LeadStatus>,
    },
    /// Show lead pipeline statistics
    Stats,
    /// Move a lead to another stage
    Update {
        /// Lead id
        id: i64,
        /// New stage
        #[arg(long)]
        status: LeadStatus,
        /// Replace the lead's notes (omit to keep them, pass "" to clear)
        #[arg(long)]
        notes: Option<String>,
    },
}

/// Checks the locally known identity before calling an admin endpoint.
/// Returns `false` (after telling the operator why) when the call should not
/// be attempted.
fn admin_allowed(session: &Session) -> bool {
    if !session.is_authenticated() {
        println!("{LOGIN_HINT}");
        return false;
    }
    if let Some(user) = session.user() {
        if !user.has_admin_access() {
            println!("{} does not have admin access", user.email);
            return false;
        }
    }
    true
}

/// Turns an authorization failure into the login hint; other errors pass through.
fn redirect_unauthorized<T>(result: Result<T, ApiError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ApiError::Unauthorized { message, .. }) => {
            tracing::debug!(%message, "admin request rejected");
            println!("{LOGIN_HINT}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

pub(crate) async fn run_leads_list(
    session: &Session,
    status: Option<LeadStatus>,
    json: bool,
) -> anyhow::Result<()> {
    if !admin_allowed(session) {
        return Ok(());
    }
    let Some(leads) = redirect_unauthorized(session.client().list_leads(status).await)? else {
        return Ok(());
    };
    if json {
        return print_json(&leads);
    }
    if leads.is_empty() {
        println!("no leads found");
        return Ok(());
    }

    println!(
        "{:<6}{:<24}{:<32}{:<11}{:<18}CREATED",
        "ID", "COMPANY", "EMAIL", "STATUS", "SERVICE"
    );
    for lead in &leads {
        println!(
            "{:<6}{:<24}{:<32}{:<11}{:<18}{}",
            lead.id,
            truncate_text(&lead.company, 22),
            truncate_text(&lead.email, 30),
            lead.status,
            truncate_text(lead.service.as_deref().unwrap_or("-"), 16),
            format_timestamp(lead.created_at.as_deref())
        );
    }
    Ok(())
}

pub(crate) async fn run_leads_stats(session: &Session, json: bool) -> anyhow::Result<()> {
    if !admin_allowed(session) {
        return Ok(());
    }
    let Some(stats) = redirect_unauthorized(session.client().lead_stats().await)? else {
        return Ok(());
    };
    if json {
        return print_json(&stats);
    }

    println!("Total leads:     {}", stats.total);
    println!("Last 7 days:     {}", stats.recent_7_days);
    println!("Emails sent:     {}", stats.emails_sent);
    println!(
        "Email success:   {}",
        format_percent(Some(stats.email_success_rate))
    );
    if !stats.by_status.is_empty() {
        println!();
        println!("{:<12}COUNT", "STATUS");
        for (status, count) in &stats.by_status {
            println!("{status:<12}{count}");
        }
    }
    if !stats.by_service.is_empty() {
        println!();
        println!("{:<24}COUNT", "SERVICE");
        for (service, count) in &stats.by_service {
            println!("{service:<24}{count}");
        }
    }
    Ok(())
}

pub(crate) async fn run_leads_update(
    session: &Session,
    id: i64,
    status: LeadStatus,
    notes: Option<&str>,
) -> anyhow::Result<()> {
    if !admin_allowed(session) {
        return Ok(());
    }
    let updated = redirect_unauthorized(session.client().update_lead(id, status, notes).await)?;
    if updated.is_some() {
        println!("lead {id} is now {status}");
    }
    Ok(())
}
