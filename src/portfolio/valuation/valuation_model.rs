use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::Instrument;
use crate::utils::decimal_serde::decimal_serde;

/// An amount carried in both the position's own (major-unit) currency and
/// the portfolio base currency.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryValue {
    #[serde(with = "decimal_serde")]
    pub local: Decimal,
    #[serde(with = "decimal_serde")]
    pub base: Decimal,
}

impl MonetaryValue {
    pub fn zero() -> Self {
        MonetaryValue {
            local: Decimal::ZERO,
            base: Decimal::ZERO,
        }
    }
}

/// A position joined with its instrument and fully valued. Derived on every
/// valuation pass, never persisted.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ValuedPosition {
    pub position_id: String,
    pub instrument: Instrument,
    pub base_currency: String,
    /// Major-unit code the `local` amounts are expressed in
    pub local_currency: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    /// Current price as quoted (possibly in minor units)
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    pub market_value: MonetaryValue,
    pub cost_basis: MonetaryValue,
    pub total_gain: MonetaryValue,
    #[serde(with = "decimal_serde")]
    pub total_gain_pct: Decimal,
    pub day_change: MonetaryValue,
    #[serde(with = "decimal_serde")]
    pub day_change_pct: Decimal,
    /// Portion of the base-currency gain from the instrument's own price move
    #[serde(with = "decimal_serde")]
    pub market_impact: Decimal,
    /// Portion of the base-currency gain from exchange-rate movement
    #[serde(with = "decimal_serde")]
    pub fx_impact: Decimal,
    /// Current FX rate applied (base units per major native unit)
    #[serde(with = "decimal_serde")]
    pub fx_rate: Decimal,
    /// Entry FX rate actually used, after any repair
    #[serde(with = "decimal_serde")]
    pub entry_fx_rate: Decimal,
    /// True when the stored entry rate looked inverted and was reciprocated
    pub fx_rate_repaired: bool,
}
