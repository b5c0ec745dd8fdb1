//! History command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::output;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Print the commits as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: HistoryArgs) -> Result<()> {
    let (ledger, _settings) = super::open_ledger()?;

    let commits = ledger.history(args.page).await;

    if args.json {
        return output::json_pretty(&commits);
    }

    if commits.is_empty() {
        eprintln!("{}", "No history found.".dimmed());
        return Ok(());
    }

    for commit in &commits {
        let short = commit.sha.get(..7).unwrap_or(&commit.sha);
        println!("{} {} {}", short.yellow(), commit.date.dimmed(), commit.message);
    }

    Ok(())
}
