//! Supported currencies and amount formatting.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, InvalidInputError};

/// A currency a subscription can be priced in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// South Korean won. The baseline for records that carry no currency.
    #[default]
    #[serde(rename = "KRW")]
    Krw,
    /// US dollar.
    #[serde(rename = "USD")]
    Usd,
    /// Japanese yen.
    #[serde(rename = "JPY")]
    Jpy,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    /// Every supported currency.
    pub const ALL: [Currency; 4] = [Currency::Krw, Currency::Usd, Currency::Jpy, Currency::Eur];

    /// ISO 4217 code.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Krw => "KRW",
            Currency::Usd => "USD",
            Currency::Jpy => "JPY",
            Currency::Eur => "EUR",
        }
    }

    /// Currency symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Krw => "₩",
            Currency::Usd => "$",
            Currency::Jpy => "¥",
            Currency::Eur => "€",
        }
    }

    /// Number of minor-unit digits shown.
    pub fn decimals(self) -> usize {
        match self {
            Currency::Krw | Currency::Jpy => 0,
            Currency::Usd | Currency::Eur => 2,
        }
    }

    /// Format an amount the way the currency's home locale writes it.
    ///
    /// ```
    /// use sublog_core::Currency;
    ///
    /// assert_eq!(Currency::Krw.format(11900.0), "₩11,900");
    /// assert_eq!(Currency::Eur.format(1234.5), "1.234,50 €");
    /// ```
    pub fn format(self, amount: f64) -> String {
        let fixed = format!("{:.*}", self.decimals(), amount.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };
        let sign = if amount < 0.0 && fixed.chars().any(|c| c != '0' && c != '.') {
            "-"
        } else {
            ""
        };

        // de-DE groups with '.' and uses ',' as the decimal separator.
        let (group_sep, decimal_sep) = match self {
            Currency::Eur => ('.', ','),
            _ => (',', '.'),
        };

        let mut number = group_digits(int_part, group_sep);
        if let Some(frac) = frac_part {
            number.push(decimal_sep);
            number.push_str(frac);
        }

        match self {
            Currency::Eur => format!("{}{} {}", sign, number, self.symbol()),
            _ => format!("{}{}{}", sign, self.symbol(), number),
        }
    }
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                InvalidInputError::Other {
                    message: format!("unsupported currency '{}'; expected KRW, USD, JPY, or EUR", s),
                }
                .into()
            })
    }
}
