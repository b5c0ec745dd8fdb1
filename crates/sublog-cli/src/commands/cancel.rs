//! Cancel command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Subscription id
    pub id: String,
}

pub async fn run(args: CancelArgs) -> Result<()> {
    let (ledger, _settings) = super::open_ledger()?;

    let cancelled = ledger
        .cancel(&args.id)
        .await
        .with_context(|| format!("Failed to cancel {}", args.id))?;

    output::success(&format!("Cancelled {}", cancelled.name));

    Ok(())
}
