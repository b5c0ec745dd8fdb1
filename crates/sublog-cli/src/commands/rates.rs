//! Rates command implementation.

use anyhow::Result;
use clap::Args;

use crate::output;

#[derive(Args, Debug)]
pub struct RatesArgs {
    /// Skip the network and show the fallback table
    #[arg(long)]
    pub offline: bool,

    /// Print the rates as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: RatesArgs) -> Result<()> {
    let rates = super::exchange_rates(args.offline).await;

    if args.json {
        return output::json_pretty(&rates);
    }

    if rates.fallback {
        output::warning("Using approximate fallback rates");
    }

    output::field("Base", rates.base.code());
    if let Some(updated) = &rates.updated_at {
        output::field("Updated", updated);
    }
    for (currency, rate) in &rates.rates {
        output::field(currency.code(), &rate.to_string());
    }

    Ok(())
}
