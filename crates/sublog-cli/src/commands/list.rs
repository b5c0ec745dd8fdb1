//! List command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;

use sublog_core::Status;

use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Include cancelled subscriptions
    #[arg(long)]
    pub all: bool,

    /// Print the records as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs) -> Result<()> {
    let (ledger, _settings) = super::open_ledger()?;

    let subscriptions: Vec<_> = ledger
        .list()
        .await
        .context("Failed to list subscriptions")?
        .into_iter()
        .filter(|s| args.all || s.status != Status::Cancelled)
        .collect();

    if args.json {
        return output::json_pretty(&subscriptions);
    }

    if subscriptions.is_empty() {
        eprintln!("{}", "No subscriptions found.".dimmed());
        return Ok(());
    }

    for sub in &subscriptions {
        output::subscription_row(sub);
    }

    Ok(())
}
