//! Exchange rate source trait.

use async_trait::async_trait;

use crate::Result;
use crate::rates::ExchangeRates;

/// An upstream provider of exchange rates.
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Fetch the latest USD-based rates.
    async fn latest(&self) -> Result<ExchangeRates>;
}
