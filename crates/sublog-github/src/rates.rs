//! Exchange rates from a public USD-based endpoint.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, instrument};

use sublog_core::error::ProtocolError;
use sublog_core::{Currency, Error, ExchangeRates, RateSource, Result};

use crate::error::map_reqwest;

/// Public endpoint returning rates against USD.
pub const DEFAULT_RATES_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// How long a successful fetch is reused.
pub const RATES_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    date: Option<String>,
    rates: HashMap<String, f64>,
}

/// Fetches USD-based exchange rates and caches them in memory.
#[derive(Debug)]
pub struct ExchangeRateClient {
    client: reqwest::Client,
    url: String,
    ttl: Duration,
    cache: RwLock<Option<(Instant, ExchangeRates)>>,
}

impl ExchangeRateClient {
    /// Client for the default endpoint.
    pub fn new() -> Result<Self> {
        Self::with_url(DEFAULT_RATES_URL)
    }

    /// Client for a custom endpoint with the same response shape.
    pub fn with_url(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("sublog/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(map_reqwest)?;

        Ok(Self {
            client,
            url: url.into(),
            ttl: RATES_TTL,
            cache: RwLock::new(None),
        })
    }

    /// Override the cache lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    async fn fetch(&self) -> Result<ExchangeRates> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(map_reqwest)?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Protocol(ProtocolError::new(status.as_u16(), None)));
        }

        let body: RatesResponse = response.json().await.map_err(map_reqwest)?;

        // Codes outside the supported set are ignored.
        let mut rates: BTreeMap<Currency, f64> = body
            .rates
            .iter()
            .filter_map(|(code, rate)| code.parse::<Currency>().ok().map(|c| (c, *rate)))
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        rates.insert(Currency::Usd, 1.0);

        Ok(ExchangeRates {
            base: Currency::Usd,
            rates,
            updated_at: body.date,
            fallback: false,
        })
    }
}

#[async_trait]
impl RateSource for ExchangeRateClient {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn latest(&self) -> Result<ExchangeRates> {
        if let Some((fetched_at, rates)) = self.cache.read().await.as_ref() {
            if fetched_at.elapsed() < self.ttl {
                debug!("Using cached exchange rates");
                return Ok(rates.clone());
            }
        }

        let rates = self.fetch().await?;
        debug!(count = rates.rates.len(), "Fetched exchange rates");
        *self.cache.write().await = Some((Instant::now(), rates.clone()));
        Ok(rates)
    }
}
