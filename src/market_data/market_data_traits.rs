use std::collections::HashMap;

use crate::errors::Result;
use crate::market_data::market_data_model::Quote;

/// Contract for the external price/quote provider. Implementations live
/// outside this crate; the core only consumes the returned snapshots.
pub trait MarketDataProviderTrait: Send + Sync {
    fn latest_quote(&self, symbol: &str) -> Result<Quote>;

    /// Batch lookup. Symbols with no available quote are simply absent from
    /// the returned map.
    fn latest_quotes(&self, symbols: &[String]) -> Result<HashMap<String, Quote>>;
}
