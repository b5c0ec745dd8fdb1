//! Resume command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct ResumeArgs {
    /// Subscription id
    pub id: String,
}

pub async fn run(args: ResumeArgs) -> Result<()> {
    let (ledger, _settings) = super::open_ledger()?;

    let resumed = ledger
        .resume(&args.id)
        .await
        .with_context(|| format!("Failed to resume {}", args.id))?;

    output::success(&format!("Resumed {}", resumed.name));

    Ok(())
}
