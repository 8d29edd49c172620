use thiserror::Error;

use crate::fx::FxError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the valuation core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Currency operation failed: {0}")]
    Currency(#[from] CurrencyError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(String),

    #[error("Store operation failed: {0}")]
    Store(String),
}

#[derive(Error, Debug)]
pub enum CurrencyError {
    #[error("Failed to convert between currencies: {0}")]
    ConversionFailed(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),
}

impl From<FxError> for Error {
    fn from(err: FxError) -> Self {
        Error::Currency(CurrencyError::ConversionFailed(err.to_string()))
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}
