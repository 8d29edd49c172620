use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::decimal_serde::decimal_serde;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// A flagged concentration: single holding, sector, country/economy, or
/// sector-within-economy.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RiskCluster {
    pub name: String,
    pub description: String,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
    #[serde(with = "decimal_serde")]
    pub percent: Decimal,
    pub severity: Severity,
}

/// A single exposure line: a holding, sector or country with its share of
/// the portfolio.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExposureEntry {
    pub name: String,
    #[serde(with = "decimal_serde")]
    pub value: Decimal,
    #[serde(with = "decimal_serde")]
    pub percent: Decimal,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RiskAnalysis {
    /// 0-100; 100 is maximally diversified
    pub score: u8,
    pub top_holding: Option<ExposureEntry>,
    pub top_sector: Option<ExposureEntry>,
    pub top_country: Option<ExposureEntry>,
    /// Blended look-through US exposure, percent of portfolio
    #[serde(with = "decimal_serde")]
    pub us_exposure_pct: Decimal,
    pub clusters: Vec<RiskCluster>,
}

impl RiskAnalysis {
    /// Result for an empty or zero-value portfolio.
    pub fn neutral() -> Self {
        RiskAnalysis {
            score: 100,
            top_holding: None,
            top_sector: None,
            top_country: None,
            us_exposure_pct: Decimal::ZERO,
            clusters: Vec::new(),
        }
    }
}
