use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use client_core::{DashboardStore, FilterAction, HttpReportApi};
use shared::domain::{DateRange, MonthRange, YearMonth};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::load_settings;
use render::render_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(about = "Fetch and aggregate one dashboard section")]
struct Args {
    /// Section slug: `dashboard` or a report such as `unsigned`.
    #[arg(long)]
    report: Option<String>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long, requires = "end_date")]
    start_date: Option<NaiveDate>,
    #[arg(long, requires = "start_date")]
    end_date: Option<NaiveDate>,
    #[arg(long, requires = "end_month")]
    start_month: Option<YearMonth>,
    #[arg(long, requires = "start_month")]
    end_month: Option<YearMonth>,
    #[arg(long = "last-3-months")]
    last_3_months: bool,
    #[arg(long)]
    practitioner: Option<String>,
    #[arg(long)]
    program: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    /// Print the available filter values instead of a snapshot.
    #[arg(long)]
    filter_options: bool,
}

/// Filter actions implied by the flags, in the order they are dispatched.
fn filter_actions(args: &Args, today: NaiveDate) -> Vec<FilterAction> {
    let mut actions = Vec::new();
    if args.last_3_months {
        actions.push(FilterAction::ApplyLast3Months { today });
    }
    if let (Some(start), Some(end)) = (args.start_date, args.end_date) {
        actions.push(FilterAction::SetDateRange(DateRange::new(start, end)));
    }
    if let (Some(start), Some(end)) = (args.start_month, args.end_month) {
        actions.push(FilterAction::SetMonthRange(MonthRange::new(start, end)));
    }
    if args.practitioner.is_some() {
        actions.push(FilterAction::SetPractitioner(args.practitioner.clone()));
    }
    if args.program.is_some() {
        actions.push(FilterAction::SetProgram(args.program.clone()));
    }
    if args.location.is_some() {
        actions.push(FilterAction::SetLocation(args.location.clone()));
    }
    actions
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(api_url) = &args.api_url {
        settings.api_base_url = api_url.clone();
    }
    let api = HttpReportApi::new(settings.base_url()?, settings.request_timeout())?;
    info!(api = %api.base_url(), "using reporting API");

    let report = args
        .report
        .clone()
        .unwrap_or_else(|| settings.default_report.clone());
    let store = DashboardStore::new(Arc::new(api), report);

    if args.filter_options {
        let options = store.filter_options().await;
        println!("{}", serde_json::to_string_pretty(&options)?);
        return Ok(());
    }

    for action in filter_actions(&args, Local::now().date_naive()) {
        if let Err(error) = store.dispatch(action.clone()).await {
            warn!(?action, %error, "filter rejected");
        }
    }

    let outcome = store.refresh().await;
    let snapshot = outcome
        .snapshot()
        .context("refresh was superseded by a newer change")?;
    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(snapshot.as_ref())?),
        OutputFormat::Text => print!("{}", render_text(snapshot)),
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
