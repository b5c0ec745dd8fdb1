//! Summary command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use sublog_core::summary::{Totals, category_breakdown, totals};
use sublog_core::{Category, Currency};

use crate::output;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Display currency (defaults to the configured one)
    #[arg(long)]
    pub currency: Option<Currency>,

    /// Use fallback exchange rates instead of fetching
    #[arg(long)]
    pub offline: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct SummaryOutput {
    #[serde(flatten)]
    totals: Totals,
    categories: Vec<CategoryTotal>,
    fallback_rates: bool,
}

#[derive(Serialize)]
struct CategoryTotal {
    category: Category,
    monthly: f64,
}

pub async fn run(args: SummaryArgs) -> Result<()> {
    let (ledger, settings) = super::open_ledger()?;
    let display = args.currency.unwrap_or(settings.currency);

    let subscriptions = ledger
        .list()
        .await
        .context("Failed to list subscriptions")?;
    let rates = super::exchange_rates(args.offline).await;

    let totals = totals(&subscriptions, display, &rates);
    let breakdown = category_breakdown(&subscriptions, display, &rates);

    if args.json {
        return output::json_pretty(&SummaryOutput {
            totals,
            categories: breakdown
                .into_iter()
                .map(|(category, monthly)| CategoryTotal { category, monthly })
                .collect(),
            fallback_rates: rates.fallback,
        });
    }

    if rates.fallback {
        output::warning("Using approximate fallback rates");
    }

    output::field("Active", &totals.active.to_string());
    output::field("Monthly", &display.format(totals.monthly));
    output::field("Yearly", &display.format(totals.yearly));

    if !breakdown.is_empty() {
        println!();
        for (category, monthly) in &breakdown {
            output::field(category.as_str(), &display.format(*monthly));
        }
    }

    Ok(())
}
