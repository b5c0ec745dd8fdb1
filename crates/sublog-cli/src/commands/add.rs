//! Add command implementation.

use std::io::Read;

use anyhow::{Context, Result};
use clap::Args;

use sublog_core::{Category, Currency, Cycle, NewSubscription};

use crate::output;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Read the subscription from a JSON file ('-' for stdin)
    #[arg(long, conflicts_with_all = ["name", "price", "currency", "cycle", "billing_day", "billing_month", "category"])]
    pub json: Option<String>,

    /// Service name
    #[arg(long, required_unless_present = "json")]
    pub name: Option<String>,

    /// Price per billing cycle
    #[arg(long, required_unless_present = "json")]
    pub price: Option<f64>,

    /// Currency code (defaults to the display currency)
    #[arg(long)]
    pub currency: Option<Currency>,

    /// Billing cycle: monthly or yearly
    #[arg(long, default_value = "monthly")]
    pub cycle: Cycle,

    /// Day of the month the charge lands on (1-31)
    #[arg(long, required_unless_present = "json")]
    pub billing_day: Option<u8>,

    /// Month of the charge for yearly subscriptions (1-12)
    #[arg(long)]
    pub billing_month: Option<u8>,

    /// Spending category
    #[arg(long)]
    pub category: Option<Category>,
}

/// Read JSON from a file path, or stdin for `-`.
pub(crate) fn read_json_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
    }
}

pub async fn run(args: AddArgs) -> Result<()> {
    let (ledger, settings) = super::open_ledger()?;

    let input = match &args.json {
        Some(source) => {
            let json = read_json_input(source)?;
            serde_json::from_str::<NewSubscription>(&json).context("Invalid subscription JSON")?
        }
        None => NewSubscription {
            name: args.name.context("--name is required")?,
            price: args.price.context("--price is required")?,
            currency: args.currency.unwrap_or(settings.currency),
            cycle: args.cycle,
            billing_day: args.billing_day.context("--billing-day is required")?,
            billing_month: args.billing_month,
            category: args.category,
        },
    };

    let created = ledger
        .add(input)
        .await
        .context("Failed to add subscription")?;

    output::success(&format!("Added {}", created.name));
    println!();
    output::subscription_detail(&created);

    Ok(())
}
