use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

/// One expected future dividend payment for a position.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedPayout {
    pub symbol: String,
    pub pay_date: NaiveDate,
    /// Total amount for the position (per-payment amount x share count),
    /// in `currency`
    #[serde(with = "decimal_serde")]
    pub amount: Decimal,
    pub currency: String,
}
