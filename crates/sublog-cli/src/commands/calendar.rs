//! Calendar command implementation.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;
use colored::Colorize;

use sublog_core::Currency;
use sublog_core::summary::{payment_calendar, year_month};

use crate::output;

#[derive(Args, Debug)]
pub struct CalendarArgs {
    /// Year (defaults to the current year)
    #[arg(long, requires = "month")]
    pub year: Option<i32>,

    /// Month, 1-12 (defaults to the current month)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,

    /// Display currency (defaults to the configured one)
    #[arg(long)]
    pub currency: Option<Currency>,

    /// Use fallback exchange rates instead of fetching
    #[arg(long)]
    pub offline: bool,

    /// Print the calendar as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: CalendarArgs) -> Result<()> {
    let (current_year, current_month) = year_month(Local::now().date_naive());
    let year = args.year.unwrap_or(current_year);
    let month = args.month.unwrap_or(current_month);

    let (ledger, settings) = super::open_ledger()?;
    let display = args.currency.unwrap_or(settings.currency);

    let subscriptions = ledger
        .list()
        .await
        .context("Failed to list subscriptions")?;
    let rates = super::exchange_rates(args.offline).await;

    let days = payment_calendar(&subscriptions, year, month, display, &rates);

    if args.json {
        return output::json_pretty(&days);
    }

    println!("{}", format!("{}-{:02}", year, month).bold());

    if days.is_empty() {
        eprintln!("{}", "No payments this month.".dimmed());
        return Ok(());
    }

    let mut total = 0.0;
    for (day, payments) in &days {
        for payment in payments {
            total += payment.amount;
            println!(
                "{:>3}  {:<24} {:>12}  {}",
                day,
                payment.name,
                display.format(payment.amount),
                payment.category.as_str().dimmed(),
            );
        }
    }

    println!();
    output::field("Total", &display.format(total));

    Ok(())
}
