use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::MAX_DIVIDEND_PAYMENT_DATES;
use crate::errors::{Result, ValidationError};
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AssetCategory {
    Equity,
    Fund,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SectorWeight {
    pub name: String,
    /// Percentage of the instrument's value, 0..=100. Declared weights need
    /// not sum to exactly 100.
    pub weight: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CountryWeight {
    pub name: String,
    pub weight: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DividendFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
    Unknown,
}

impl DividendFrequency {
    /// Annualization factor. Unknown frequencies are treated as annual so a
    /// projection is still produced.
    pub fn payments_per_year(&self) -> u32 {
        match self {
            DividendFrequency::Monthly => 12,
            DividendFrequency::Quarterly => 4,
            DividendFrequency::SemiAnnual => 2,
            DividendFrequency::Annual => 1,
            DividendFrequency::Unknown => 1,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DividendPaymentDate {
    pub ex_date: Option<NaiveDate>,
    pub pay_date: NaiveDate,
}

/// Dividend metadata as supplied by the instrument catalog. Either a
/// per-payment amount or a trailing yield may be present; when both are,
/// the per-payment amount wins. Dates come either as a single recurring
/// ex/pay pair or as an explicit list of dated payments.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DividendInfo {
    #[serde(with = "decimal_serde_option")]
    pub amount_per_payment: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub trailing_yield_pct: Option<Decimal>,
    pub frequency: Option<DividendFrequency>,
    pub ex_date: Option<NaiveDate>,
    pub pay_date: Option<NaiveDate>,
    pub payment_dates: Vec<DividendPaymentDate>,
    pub dividend_currency: Option<String>,
}

impl DividendInfo {
    pub fn frequency_or_default(&self) -> DividendFrequency {
        self.frequency.unwrap_or(DividendFrequency::Unknown)
    }
}

/// An instrument in the catalog ("stock" in the domain): an equity or fund
/// with its quote data, classification and dividend metadata. Created by a
/// user action or an import; price fields are mutated on refresh; never
/// implicitly deleted while referenced by a position or watch-list.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub id: String,
    pub symbol: String,
    pub isin: Option<String>,
    /// Local security code used by some markets alongside the ticker
    pub local_code: Option<String>,
    pub name: String,
    pub category: AssetCategory,
    /// Quote currency; may be a minor-unit code such as GBp
    pub currency: String,
    #[serde(with = "decimal_serde")]
    pub current_price: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub previous_close: Option<Decimal>,
    pub sector: Option<String>,
    pub country: Option<String>,
    pub sector_weights: Option<Vec<SectorWeight>>,
    pub country_weights: Option<Vec<CountryWeight>>,
    pub dividend: Option<DividendInfo>,
    #[serde(with = "decimal_serde_option")]
    pub target_price: Option<Decimal>,
}

impl Instrument {
    pub fn new(
        symbol: &str,
        name: &str,
        category: AssetCategory,
        currency: &str,
        current_price: Decimal,
    ) -> Result<Self> {
        if current_price < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Negative price {} for instrument {}",
                current_price, symbol
            ))
            .into());
        }
        if currency.trim().is_empty() {
            return Err(ValidationError::MissingField("currency".to_string()).into());
        }

        Ok(Instrument {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            isin: None,
            local_code: None,
            name: name.to_string(),
            category,
            currency: currency.to_string(),
            current_price,
            previous_close: None,
            sector: None,
            country: None,
            sector_weights: None,
            country_weights: None,
            dividend: None,
            target_price: None,
        })
    }

    /// Attaches dividend metadata, capping an over-long explicit schedule.
    pub fn with_dividend(mut self, mut dividend: DividendInfo) -> Self {
        dividend.payment_dates.truncate(MAX_DIVIDEND_PAYMENT_DATES);
        self.dividend = Some(dividend);
        self
    }

    pub fn is_fund(&self) -> bool {
        self.category == AssetCategory::Fund
    }
}
