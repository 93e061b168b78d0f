//! Brand tracking commands: list tracked brands, show one with its run
//! history, delete one.

use clap::Subcommand;
use geotrack_api::ApiClient;
use geotrack_core::format::{format_percent, format_timestamp, sentiment_label, truncate_text};
use geotrack_core::BrandRun;

use crate::output::print_json;

/// Sub-commands available under `brands`.
#[derive(Debug, Subcommand)]
pub enum BrandsCommands {
    /// List tracked brands
    List {
        /// Only brands of this company
        #[arg(long)]
        company_id: Option<String>,
        /// Maximum number of brands to show
        #[arg(long, default_value = "50")]
        limit: u32,
    },
    /// Show a brand and its recent runs, by id or by name
    Show {
        /// Numeric brand id, or the brand name to search for
        brand: String,
        /// Maximum number of runs to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Delete a tracked brand and its history
    Delete {
        /// Numeric brand id
        id: i64,
    },
}

pub(crate) async fn run_brands_list(
    client: &ApiClient,
    company_id: Option<&str>,
    limit: u32,
    json: bool,
) -> anyhow::Result<()> {
    let brands = client.list_brands(company_id, limit).await?;
    if json {
        return print_json(&brands);
    }
    if brands.is_empty() {
        println!("no tracked brands; start one with `geotrack run`");
        return Ok(());
    }

    println!(
        "{:<6}{:<28}{:<18}{:<8}{:>6}{:>11}  LAST RUN",
        "ID", "BRAND", "INDUSTRY", "MARKET", "RUNS", "VISIBILITY"
    );
    for brand in &brands {
        println!(
            "{:<6}{:<28}{:<18}{:<8}{:>6}{:>11}  {}",
            brand.id,
            truncate_text(&brand.brand_name, 26),
            truncate_text(brand.industry.as_deref().unwrap_or("-"), 16),
            brand.market.as_deref().unwrap_or("-"),
            brand.total_runs,
            format_percent(brand.avg_visibility),
            format_timestamp(brand.last_run_at.as_deref())
        );
    }
    Ok(())
}

fn print_history(history: &[BrandRun]) {
    if history.is_empty() {
        println!("no runs recorded");
        return;
    }
    println!(
        "{:<20}{:>8}{:>11}  {:<10}PROVIDERS",
        "WHEN", "QUERIES", "VISIBILITY", "SENTIMENT"
    );
    for run in history {
        println!(
            "{:<20}{:>8}{:>11}  {:<10}{}",
            format_timestamp(run.created_at.as_deref()),
            run.total_queries,
            format_percent(run.visibility_pct),
            sentiment_label(run.avg_sentiment),
            run.providers.join(",")
        );
    }
}

/// Resolves `brand` as an id when numeric, otherwise by name search.
pub(crate) async fn run_brands_show(
    client: &ApiClient,
    brand: &str,
    limit: u32,
    json: bool,
) -> anyhow::Result<()> {
    let brand_id = if let Ok(id) = brand.trim().parse::<i64>() {
        id
    } else {
        client
            .find_brand(brand.trim(), None)
            .await?
            .ok_or_else(|| anyhow::anyhow!("brand '{brand}' is not tracked"))?
            .id
    };

    let detail = client.brand(brand_id).await?;
    let history = client.brand_history(brand_id, limit).await?;
    if json {
        return print_json(&serde_json::json!({
            "brand": detail.brand,
            "history": history,
        }));
    }

    let record = &detail.brand;
    println!("Brand:       {} (#{})", record.brand_name, record.id);
    println!("Industry:    {}", record.industry.as_deref().unwrap_or("-"));
    println!("Market:      {}", record.market.as_deref().unwrap_or("-"));
    println!(
        "Runs:        {} ({} queries)",
        record.total_runs, record.total_queries
    );
    println!("Visibility:  {}", format_percent(record.avg_visibility));
    println!("Tracked:     {}", format_timestamp(record.created_at.as_deref()));
    println!();
    print_history(&history);
    Ok(())
}

pub(crate) async fn run_brands_delete(client: &ApiClient, id: i64) -> anyhow::Result<()> {
    let message = client.delete_brand(id).await?;
    println!("{message}");
    Ok(())
}
