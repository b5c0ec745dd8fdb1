//! Field constraint checks shared by stored records and caller input.

use crate::error::{FieldIssue, ValidationError};

/// Collects every failing field before reporting.
#[derive(Debug, Default)]
pub(crate) struct Issues(Vec<FieldIssue>);

impl Issues {
    fn push(&mut self, field: &'static str, reason: &str) {
        self.0.push(FieldIssue {
            field,
            reason: reason.to_string(),
        });
    }

    pub(crate) fn name(&mut self, name: &str) {
        if name.is_empty() {
            self.push("name", "must not be empty");
        }
    }

    pub(crate) fn price(&mut self, price: f64) {
        if !price.is_finite() || price <= 0.0 {
            self.push("price", "must be a positive number");
        }
    }

    pub(crate) fn billing_day(&mut self, day: u8) {
        if !(1..=31).contains(&day) {
            self.push("billing_day", "must be between 1 and 31");
        }
    }

    pub(crate) fn billing_month(&mut self, month: u8) {
        if !(1..=12).contains(&month) {
            self.push("billing_month", "must be between 1 and 12");
        }
    }

    pub(crate) fn other(&mut self, field: &'static str, reason: &str) {
        self.push(field, reason);
    }

    pub(crate) fn finish(self) -> Result<(), ValidationError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(self.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collector_passes() {
        assert!(Issues::default().finish().is_ok());
    }

    #[test]
    fn rejects_non_finite_price() {
        let mut issues = Issues::default();
        issues.price(f64::NAN);
        issues.price(f64::INFINITY);
        issues.price(0.0);
        assert_eq!(issues.finish().unwrap_err().issues().len(), 3);
    }

    #[test]
    fn accepts_boundary_days_and_months() {
        let mut issues = Issues::default();
        issues.billing_day(1);
        issues.billing_day(31);
        issues.billing_month(1);
        issues.billing_month(12);
        assert!(issues.finish().is_ok());
    }

    #[test]
    fn rejects_out_of_range_days_and_months() {
        let mut issues = Issues::default();
        issues.billing_day(0);
        issues.billing_month(13);
        let err = issues.finish().unwrap_err();
        let fields: Vec<_> = err.issues().iter().map(|i| i.field).collect();
        assert_eq!(fields, vec!["billing_day", "billing_month"]);
    }
}
