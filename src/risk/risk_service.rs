use lazy_static::lazy_static;
use log::debug;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{HashMap, HashSet};

use crate::constants::WORLD_TO_US_BLEND;
use crate::portfolio::valuation::ValuedPosition;
use crate::risk::risk_model::{ExposureEntry, RiskAnalysis, RiskCluster, Severity};

/// Bucket for funds that declare no sector breakdown
const FUND_SECTOR_BUCKET: &str = "Fund";
/// Bucket for instruments with no sector at all
const OTHER_SECTOR_BUCKET: &str = "Other";
const UNKNOWN_COUNTRY_BUCKET: &str = "Unknown";
const US_LABEL: &str = "US";
const WORLD_LABEL: &str = "World";
const TECHNOLOGY_LABEL: &str = "Technology";

const TOP_HOLDING_FLAG_PCT: Decimal = dec!(15);
const TOP_HOLDING_HIGH_PCT: Decimal = dec!(25);
const TOP_HOLDING_PENALTY_FROM_PCT: Decimal = dec!(10);
const TOP_HOLDING_PENALTY_WEIGHT: Decimal = dec!(1.5);
const SECTOR_FLAG_PCT: Decimal = dec!(25);
const SECTOR_HIGH_PCT: Decimal = dec!(40);
const SECTOR_PENALTY_FROM_PCT: Decimal = dec!(20);
const US_FLAG_PCT: Decimal = dec!(55);
const US_HIGH_PCT: Decimal = dec!(70);
const US_PENALTY_FROM_PCT: Decimal = dec!(60);
const COUNTRY_FALLBACK_FLAG_PCT: Decimal = dec!(40);
const US_TECH_FLAG_PCT: Decimal = dec!(20);
const US_TECH_HIGH_PCT: Decimal = dec!(35);
const US_TECH_PENALTY_FROM_PCT: Decimal = dec!(15);

lazy_static! {
    /// Broad US index trackers counted into the US-technology-and-megacap
    /// cluster regardless of their declared sector breakdown.
    static ref US_INDEX_FUND_SYMBOLS: HashSet<&'static str> =
        ["SPY", "VOO", "IVV", "VTI", "ITOT", "SCHB", "QQQ"]
            .into_iter()
            .collect();
}

#[derive(Debug, Clone, Copy)]
pub struct RiskOptions {
    /// Share of world/global fund value attributed to the US
    pub world_to_us_blend: Decimal,
}

impl Default for RiskOptions {
    fn default() -> Self {
        RiskOptions {
            world_to_us_blend: WORLD_TO_US_BLEND,
        }
    }
}

fn normalize_country(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.to_lowercase().as_str() {
        "" => UNKNOWN_COUNTRY_BUCKET.to_string(),
        "us" | "usa" | "u.s." | "united states" | "united states of america" => {
            US_LABEL.to_string()
        }
        "world" | "global" | "international" | "developed markets" => WORLD_LABEL.to_string(),
        "uk" | "united kingdom" | "great britain" => "UK".to_string(),
        _ => trimmed.to_string(),
    }
}

fn normalize_sector(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.to_lowercase().as_str() {
        "" => OTHER_SECTOR_BUCKET.to_string(),
        "technology" | "information technology" | "tech" => TECHNOLOGY_LABEL.to_string(),
        _ => trimmed.to_string(),
    }
}

fn weight_fraction(weight: f64) -> Decimal {
    Decimal::from_f64_retain(weight).unwrap_or(Decimal::ZERO) / Decimal::ONE_HUNDRED
}

/// Splits one position's value across sector labels. Weight maps distribute
/// proportionally (weights applied independently, no renormalization);
/// unlabeled funds land in the generic fund bucket.
fn sector_exposure(position: &ValuedPosition) -> Vec<(String, Decimal)> {
    let value = position.market_value.base;
    if let Some(weights) = &position.instrument.sector_weights {
        if !weights.is_empty() {
            return weights
                .iter()
                .map(|w| (normalize_sector(&w.name), value * weight_fraction(w.weight)))
                .collect();
        }
    }
    if let Some(sector) = &position.instrument.sector {
        vec![(normalize_sector(sector), value)]
    } else if position.instrument.is_fund() {
        vec![(FUND_SECTOR_BUCKET.to_string(), value)]
    } else {
        vec![(OTHER_SECTOR_BUCKET.to_string(), value)]
    }
}

fn country_exposure(position: &ValuedPosition) -> Vec<(String, Decimal)> {
    let value = position.market_value.base;
    if let Some(weights) = &position.instrument.country_weights {
        if !weights.is_empty() {
            return weights
                .iter()
                .map(|w| (normalize_country(&w.name), value * weight_fraction(w.weight)))
                .collect();
        }
    }
    match &position.instrument.country {
        Some(country) => vec![(normalize_country(country), value)],
        None => vec![(UNKNOWN_COUNTRY_BUCKET.to_string(), value)],
    }
}

/// Value this position contributes to the US technology cluster: a declared
/// Technology weight when present, else the flat sector label. Gated on the
/// instrument's country label; index trackers are handled by symbol instead.
fn us_tech_value(position: &ValuedPosition) -> Decimal {
    if US_INDEX_FUND_SYMBOLS.contains(position.instrument.symbol.as_str()) {
        return Decimal::ZERO;
    }
    let country = position
        .instrument
        .country
        .as_deref()
        .map(normalize_country)
        .unwrap_or_else(|| UNKNOWN_COUNTRY_BUCKET.to_string());
    if country != US_LABEL {
        return Decimal::ZERO;
    }

    let value = position.market_value.base;
    if let Some(weights) = &position.instrument.sector_weights {
        if !weights.is_empty() {
            return weights
                .iter()
                .filter(|w| normalize_sector(&w.name) == TECHNOLOGY_LABEL)
                .map(|w| value * weight_fraction(w.weight))
                .sum();
        }
    }
    match &position.instrument.sector {
        Some(sector) if normalize_sector(sector) == TECHNOLOGY_LABEL => value,
        _ => Decimal::ZERO,
    }
}

fn dominant(
    map: &HashMap<String, Decimal>,
    excluded: &[&str],
) -> Option<(String, Decimal)> {
    map.iter()
        .filter(|(name, _)| !excluded.contains(&name.as_str()))
        .max_by(|a, b| a.1.cmp(b.1))
        .map(|(name, value)| (name.clone(), *value))
}

pub fn analyze(positions: &[ValuedPosition]) -> RiskAnalysis {
    analyze_with_options(positions, RiskOptions::default())
}

/// Concentration analysis over positions already valued in the base
/// currency. Emits independent clusters (several may fire) and an additive
/// 0-100 diversification score.
pub fn analyze_with_options(positions: &[ValuedPosition], options: RiskOptions) -> RiskAnalysis {
    let total: Decimal = positions.iter().map(|p| p.market_value.base).sum();
    if positions.is_empty() || total <= Decimal::ZERO {
        return RiskAnalysis::neutral();
    }
    let pct = |value: Decimal| value / total * Decimal::ONE_HUNDRED;

    let mut sector_values: HashMap<String, Decimal> = HashMap::new();
    let mut country_values: HashMap<String, Decimal> = HashMap::new();
    let mut us_tech_total = Decimal::ZERO;

    for position in positions {
        for (sector, value) in sector_exposure(position) {
            *sector_values.entry(sector).or_insert(Decimal::ZERO) += value;
        }
        for (country, value) in country_exposure(position) {
            *country_values.entry(country).or_insert(Decimal::ZERO) += value;
        }
        us_tech_total += us_tech_value(position);
        if US_INDEX_FUND_SYMBOLS.contains(position.instrument.symbol.as_str()) {
            us_tech_total += position.market_value.base;
        }
    }

    let Some(top_position) = positions
        .iter()
        .max_by(|a, b| a.market_value.base.cmp(&b.market_value.base))
    else {
        return RiskAnalysis::neutral();
    };
    let top_value = top_position.market_value.base;
    let top_pct = pct(top_value);
    let top_is_fund = top_position.instrument.is_fund();

    let top_sector = dominant(&sector_values, &[FUND_SECTOR_BUCKET, OTHER_SECTOR_BUCKET]);
    let top_country = dominant(&country_values, &[UNKNOWN_COUNTRY_BUCKET]);

    let us_direct = country_values
        .get(US_LABEL)
        .copied()
        .unwrap_or(Decimal::ZERO);
    let world_value = country_values
        .get(WORLD_LABEL)
        .copied()
        .unwrap_or(Decimal::ZERO);
    // Look-through estimate: global funds are treated as carrying a fixed
    // US share even though they are not labeled US.
    let virtual_us_value = us_direct + world_value * options.world_to_us_blend;
    let us_pct = pct(virtual_us_value);
    let us_tech_pct = pct(us_tech_total);

    let mut clusters = Vec::new();

    if top_pct > TOP_HOLDING_FLAG_PCT && !top_is_fund {
        clusters.push(RiskCluster {
            name: "Single holding".to_string(),
            description: format!(
                "{} makes up {}% of the portfolio",
                top_position.instrument.symbol,
                top_pct.round_dp(1)
            ),
            value: top_value,
            percent: top_pct,
            severity: if top_pct > TOP_HOLDING_HIGH_PCT {
                Severity::High
            } else {
                Severity::Medium
            },
        });
    }

    if let Some((sector, value)) = &top_sector {
        let sector_pct = pct(*value);
        if sector_pct > SECTOR_FLAG_PCT {
            clusters.push(RiskCluster {
                name: "Sector".to_string(),
                description: format!(
                    "{} holdings make up {}% of the portfolio",
                    sector,
                    sector_pct.round_dp(1)
                ),
                value: *value,
                percent: sector_pct,
                severity: if sector_pct > SECTOR_HIGH_PCT {
                    Severity::High
                } else {
                    Severity::Medium
                },
            });
        }
    }

    if us_pct > US_FLAG_PCT {
        clusters.push(RiskCluster {
            name: "US exposure".to_string(),
            description: format!(
                "Estimated US exposure is {}% including the US share of global funds",
                us_pct.round_dp(1)
            ),
            value: virtual_us_value,
            percent: us_pct,
            severity: if us_pct > US_HIGH_PCT {
                Severity::High
            } else {
                Severity::Medium
            },
        });
    } else if let Some((country, value)) =
        dominant(&country_values, &[UNKNOWN_COUNTRY_BUCKET, WORLD_LABEL, US_LABEL])
    {
        let country_pct = pct(value);
        if country_pct > COUNTRY_FALLBACK_FLAG_PCT {
            clusters.push(RiskCluster {
                name: "Country".to_string(),
                description: format!(
                    "{} holdings make up {}% of the portfolio",
                    country,
                    country_pct.round_dp(1)
                ),
                value,
                percent: country_pct,
                severity: Severity::Medium,
            });
        }
    }

    if us_tech_pct > US_TECH_FLAG_PCT {
        clusters.push(RiskCluster {
            name: "US technology".to_string(),
            description: format!(
                "US technology holdings and US index funds make up {}% of the portfolio",
                us_tech_pct.round_dp(1)
            ),
            value: us_tech_total,
            percent: us_tech_pct,
            severity: if us_tech_pct > US_TECH_HIGH_PCT {
                Severity::High
            } else {
                Severity::Medium
            },
        });
    }

    // Additive, independent penalties; each kicks in past its own floor.
    let mut score = Decimal::ONE_HUNDRED;
    if top_pct > TOP_HOLDING_PENALTY_FROM_PCT && !top_is_fund {
        score -= TOP_HOLDING_PENALTY_WEIGHT * (top_pct - TOP_HOLDING_PENALTY_FROM_PCT);
    }
    if let Some((_, value)) = &top_sector {
        let sector_pct = pct(*value);
        if sector_pct > SECTOR_PENALTY_FROM_PCT {
            score -= sector_pct - SECTOR_PENALTY_FROM_PCT;
        }
    }
    if us_tech_pct > US_TECH_FLAG_PCT {
        score -= us_tech_pct - US_TECH_PENALTY_FROM_PCT;
    }
    if us_pct > US_PENALTY_FROM_PCT {
        score -= us_pct - US_PENALTY_FROM_PCT;
    }
    let score = score
        .max(Decimal::ZERO)
        .min(Decimal::ONE_HUNDRED)
        .round()
        .to_u8()
        .unwrap_or(0);

    debug!(
        "Risk analysis: score {}, {} clusters, US exposure {}%",
        score,
        clusters.len(),
        us_pct.round_dp(1)
    );

    RiskAnalysis {
        score,
        top_holding: Some(ExposureEntry {
            name: top_position.instrument.symbol.clone(),
            value: top_value,
            percent: top_pct,
        }),
        top_sector: top_sector.map(|(name, value)| ExposureEntry {
            name,
            value,
            percent: pct(value),
        }),
        top_country: top_country.map(|(name, value)| ExposureEntry {
            name,
            value,
            percent: pct(value),
        }),
        us_exposure_pct: us_pct,
        clusters,
    }
}
