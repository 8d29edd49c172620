use crate::errors::Result;
use crate::fx::fx_model::ExchangeRateTable;

/// Contract for the external reference-rate provider.
///
/// The provider owns the refresh cadence (typically once per day) and serves
/// a cached snapshot in between; the core never fetches rates itself.
pub trait RateProviderTrait: Send + Sync {
    fn latest_rates(&self) -> Result<ExchangeRateTable>;
}
