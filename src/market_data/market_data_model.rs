use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// Latest quote for a symbol as supplied by a market-data provider.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub previous_close: Option<Decimal>,
    pub currency: String,
    pub timestamp: DateTime<Utc>,
}
