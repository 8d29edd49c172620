use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum FxError {
    RateNotFound(String),
    InvalidCurrencyCode(String),
    FetchError(String),
}

impl fmt::Display for FxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FxError::RateNotFound(msg) => write!(f, "Exchange rate not found: {}", msg),
            FxError::InvalidCurrencyCode(msg) => write!(f, "Invalid currency code: {}", msg),
            FxError::FetchError(msg) => write!(f, "Fetch error: {}", msg),
        }
    }
}

impl Error for FxError {}
