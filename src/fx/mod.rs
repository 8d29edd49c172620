pub mod currency;
pub mod currency_converter;
pub mod fx_errors;
pub mod fx_model;
pub mod fx_traits;

pub use currency_converter::{convert, rate_to_base};
pub use fx_errors::FxError;
pub use fx_model::ExchangeRateTable;
pub use fx_traits::RateProviderTrait;
