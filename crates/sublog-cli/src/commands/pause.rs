//! Pause command implementation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct PauseArgs {
    /// Subscription id
    pub id: String,

    /// Resume date as RFC 3339, e.g. 2026-12-01T00:00:00Z
    #[arg(long)]
    pub until: Option<DateTime<Utc>>,
}

pub async fn run(args: PauseArgs) -> Result<()> {
    let (ledger, _settings) = super::open_ledger()?;

    let paused = ledger
        .pause(&args.id, args.until)
        .await
        .with_context(|| format!("Failed to pause {}", args.id))?;

    output::success(&format!("Paused {}", paused.name));
    if let Some(until) = paused.paused_until {
        output::field("Until", &until.to_rfc3339());
    }

    Ok(())
}
