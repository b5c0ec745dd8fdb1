//! Update command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use sublog_core::{Category, Currency, Cycle, SubscriptionPatch};

use super::add::read_json_input;
use crate::output;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Subscription id
    pub id: String,

    /// Read the changes from a JSON file ('-' for stdin)
    #[arg(long, conflicts_with_all = ["name", "price", "currency", "cycle", "billing_day", "billing_month", "clear_billing_month", "category"])]
    pub json: Option<String>,

    /// New service name
    #[arg(long)]
    pub name: Option<String>,

    /// New price per billing cycle
    #[arg(long)]
    pub price: Option<f64>,

    /// New currency code
    #[arg(long)]
    pub currency: Option<Currency>,

    /// New billing cycle
    #[arg(long)]
    pub cycle: Option<Cycle>,

    /// New billing day (1-31)
    #[arg(long)]
    pub billing_day: Option<u8>,

    /// New billing month for yearly subscriptions (1-12)
    #[arg(long, conflicts_with = "clear_billing_month")]
    pub billing_month: Option<u8>,

    /// Remove the billing month
    #[arg(long)]
    pub clear_billing_month: bool,

    /// New category
    #[arg(long)]
    pub category: Option<Category>,
}

impl UpdateArgs {
    fn patch(&self) -> Result<SubscriptionPatch> {
        if let Some(source) = &self.json {
            let json = read_json_input(source)?;
            return serde_json::from_str(&json).context("Invalid update JSON");
        }

        let billing_month = if self.clear_billing_month {
            Some(None)
        } else {
            self.billing_month.map(Some)
        };

        Ok(SubscriptionPatch {
            name: self.name.clone(),
            price: self.price,
            currency: self.currency,
            cycle: self.cycle,
            billing_day: self.billing_day,
            billing_month,
            category: self.category,
            ..Default::default()
        })
    }
}

pub async fn run(args: UpdateArgs) -> Result<()> {
    let patch = args.patch()?;
    if patch.is_empty() {
        bail!("Nothing to update. Pass at least one field to change.");
    }

    let (ledger, _settings) = super::open_ledger()?;

    let updated = ledger
        .update(&args.id, patch)
        .await
        .with_context(|| format!("Failed to update {}", args.id))?;

    output::success(&format!("Updated {}", updated.name));
    println!();
    output::subscription_detail(&updated);

    Ok(())
}
