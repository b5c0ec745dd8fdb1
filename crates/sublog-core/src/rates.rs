//! Exchange rates and currency conversion.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::subscription::Currency;
use crate::traits::RateSource;

/// Approximate USD-based rates used when the upstream source is unavailable.
const FALLBACK_USD_RATES: [(Currency, f64); 4] = [
    (Currency::Usd, 1.0),
    (Currency::Krw, 1350.0),
    (Currency::Jpy, 150.0),
    (Currency::Eur, 0.92),
];

/// Exchange rates relative to a base currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRates {
    /// Currency every rate is quoted against (always USD).
    pub base: Currency,

    /// Units of each currency per one unit of `base`.
    pub rates: BTreeMap<Currency, f64>,

    /// Upstream publication date, if known.
    pub updated_at: Option<String>,

    /// True when these are the static fallback rates.
    #[serde(default)]
    pub fallback: bool,
}

impl ExchangeRates {
    /// The static fallback table.
    pub fn fallback() -> Self {
        Self {
            base: Currency::Usd,
            rates: FALLBACK_USD_RATES.into_iter().collect(),
            updated_at: None,
            fallback: true,
        }
    }

    /// Rate for a currency; an unknown rate counts as 1.
    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates.get(&currency).copied().unwrap_or(1.0)
    }

    /// Convert an amount between currencies by way of the base currency.
    ///
    /// ```
    /// use sublog_core::{Currency, ExchangeRates};
    ///
    /// let rates = ExchangeRates::fallback();
    /// assert_eq!(rates.convert(13.5, Currency::Usd, Currency::Krw), 18225.0);
    /// ```
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> f64 {
        if from == to {
            return amount;
        }
        (amount / self.rate(from)) * self.rate(to)
    }
}

/// Fetch rates from `source`, degrading to the fallback table on any failure.
pub async fn latest_or_fallback<S>(source: &S) -> ExchangeRates
where
    S: RateSource + ?Sized,
{
    match source.latest().await {
        Ok(rates) => rates,
        Err(e) => {
            warn!(error = %e, "Exchange rate source unavailable, using fallback rates");
            ExchangeRates::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, TransportError};
    use async_trait::async_trait;

    struct Failing;

    #[async_trait]
    impl RateSource for Failing {
        async fn latest(&self) -> crate::Result<ExchangeRates> {
            Err(Error::Transport(TransportError::Timeout))
        }
    }

    struct Fixed(ExchangeRates);

    #[async_trait]
    impl RateSource for Fixed {
        async fn latest(&self) -> crate::Result<ExchangeRates> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn same_currency_is_identity() {
        let rates = ExchangeRates::fallback();
        assert_eq!(rates.convert(42.0, Currency::Eur, Currency::Eur), 42.0);
    }

    #[test]
    fn converts_through_usd() {
        let rates = ExchangeRates::fallback();
        let krw = rates.convert(1350.0, Currency::Krw, Currency::Jpy);
        assert!((krw - 150.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_rate_counts_as_one() {
        let rates = ExchangeRates {
            base: Currency::Usd,
            rates: BTreeMap::from([(Currency::Usd, 1.0)]),
            updated_at: None,
            fallback: false,
        };
        assert_eq!(rates.convert(10.0, Currency::Usd, Currency::Eur), 10.0);
    }

    #[test]
    fn serializes_with_codes_as_keys() {
        let json = serde_json::to_value(ExchangeRates::fallback()).unwrap();
        assert_eq!(json["base"], "USD");
        assert_eq!(json["rates"]["KRW"], 1350.0);
        assert_eq!(json["fallback"], true);
        assert!(json["updatedAt"].is_null());
    }

    #[tokio::test]
    async fn failing_source_degrades_to_fallback() {
        let rates = latest_or_fallback(&Failing).await;
        assert!(rates.fallback);
        assert_eq!(rates.rate(Currency::Krw), 1350.0);
    }

    #[tokio::test]
    async fn working_source_is_used() {
        let mut live = ExchangeRates::fallback();
        live.fallback = false;
        live.rates.insert(Currency::Krw, 1400.0);
        let rates = latest_or_fallback(&Fixed(live)).await;
        assert!(!rates.fallback);
        assert_eq!(rates.rate(Currency::Krw), 1400.0);
    }
}
