//! Output formatting helpers.

use anyhow::Result;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use sublog_core::{Cycle, Status, Subscription};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning to stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn status(status: Status) -> ColoredString {
    match status {
        Status::Active => "active".green(),
        Status::Paused => "paused".yellow(),
        Status::Cancelled => "cancelled".red(),
    }
}

fn schedule(sub: &Subscription) -> String {
    match (sub.cycle, sub.billing_month) {
        (Cycle::Monthly, _) => format!("monthly, day {}", sub.billing_day),
        (Cycle::Yearly, Some(month)) => format!("yearly, {}/{}", month, sub.billing_day),
        (Cycle::Yearly, None) => format!("yearly, day {}", sub.billing_day),
    }
}

/// Print one subscription as a single line.
pub fn subscription_row(sub: &Subscription) {
    println!(
        "{:<24} {:<24} {:>12}  {:<18} {:<10} {}",
        sub.id.dimmed(),
        sub.name,
        sub.currency.format(sub.price),
        schedule(sub),
        status(sub.status),
        sub.category_or_default(),
    );
}

/// Print a subscription's fields.
pub fn subscription_detail(sub: &Subscription) {
    field("ID", &sub.id);
    field("Name", &sub.name);
    field("Price", &sub.currency.format(sub.price));
    field("Billing", &schedule(sub));
    field("Status", &status(sub.status).to_string());
    if let Some(until) = sub.paused_until {
        field("Paused until", &until.to_rfc3339());
    }
    field("Category", sub.category_or_default().as_str());
}
