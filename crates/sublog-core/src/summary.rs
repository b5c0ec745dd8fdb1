//! Spending summaries over active subscriptions.
//!
//! All amounts are converted into a single display currency. Paused and
//! cancelled subscriptions are ignored.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::rates::ExchangeRates;
use crate::subscription::{Category, Currency, Cycle, Subscription};

/// Headline totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Totals {
    /// Number of active subscriptions.
    pub active: usize,
    /// Monthly-equivalent spend.
    pub monthly: f64,
    /// Yearly-equivalent spend.
    pub yearly: f64,
    /// Currency of `monthly` and `yearly`.
    pub currency: Currency,
}

/// One subscription charge on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPayment {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub category: Category,
}

fn monthly_equivalent(sub: &Subscription) -> f64 {
    match sub.cycle {
        Cycle::Monthly => sub.price,
        Cycle::Yearly => sub.price / 12.0,
    }
}

fn yearly_equivalent(sub: &Subscription) -> f64 {
    match sub.cycle {
        Cycle::Monthly => sub.price * 12.0,
        Cycle::Yearly => sub.price,
    }
}

/// Count and monthly/yearly totals of active subscriptions.
pub fn totals(subscriptions: &[Subscription], display: Currency, rates: &ExchangeRates) -> Totals {
    let active: Vec<_> = subscriptions.iter().filter(|s| s.is_active()).collect();

    let monthly = active
        .iter()
        .map(|s| rates.convert(monthly_equivalent(s), s.currency, display))
        .sum();
    let yearly = active
        .iter()
        .map(|s| rates.convert(yearly_equivalent(s), s.currency, display))
        .sum();

    Totals {
        active: active.len(),
        monthly,
        yearly,
        currency: display,
    }
}

/// Monthly-equivalent spend per category, largest first.
///
/// Subscriptions without a category count as [`Category::Other`].
/// Categories with no spend are omitted.
pub fn category_breakdown(
    subscriptions: &[Subscription],
    display: Currency,
    rates: &ExchangeRates,
) -> Vec<(Category, f64)> {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for sub in subscriptions.iter().filter(|s| s.is_active()) {
        let amount = rates.convert(monthly_equivalent(sub), sub.currency, display);
        *totals.entry(sub.category_or_default()).or_default() += amount;
    }

    let mut sorted: Vec<_> = totals.into_iter().filter(|(_, total)| *total > 0.0).collect();
    sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
    sorted
}

/// Number of days in a month, or `None` for an invalid year/month.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// Charges per day of the given month (1-based), keyed by day of month.
///
/// Billing days past the end of the month fall on its last day. Monthly
/// subscriptions appear every month; yearly ones only in their
/// `billing_month`, or every month when they have none.
pub fn payment_calendar(
    subscriptions: &[Subscription],
    year: i32,
    month: u32,
    display: Currency,
    rates: &ExchangeRates,
) -> BTreeMap<u32, Vec<DayPayment>> {
    let mut days: BTreeMap<u32, Vec<DayPayment>> = BTreeMap::new();
    let Some(last_day) = days_in_month(year, month) else {
        return days;
    };

    for sub in subscriptions.iter().filter(|s| s.is_active()) {
        let charged = match (sub.cycle, sub.billing_month) {
            (Cycle::Monthly, _) | (Cycle::Yearly, None) => true,
            (Cycle::Yearly, Some(billing_month)) => u32::from(billing_month) == month,
        };
        if !charged {
            continue;
        }

        let day = u32::from(sub.billing_day).min(last_day);
        days.entry(day).or_default().push(DayPayment {
            id: sub.id.clone(),
            name: sub.name.clone(),
            amount: rates.convert(sub.price, sub.currency, display),
            category: sub.category_or_default(),
        });
    }

    days
}

/// Year and month of a date, for calendar defaults.
pub fn year_month(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
