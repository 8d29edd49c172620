use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::QUANTITY_TOLERANCE;
use crate::errors::{Result, ValidationError};
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};

/// A single purchase lot, kept when historically accurate gain computation
/// is wanted.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLot {
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    /// Price per share in the instrument's quote currency
    #[serde(with = "decimal_serde")]
    pub price: Decimal,
    pub date: NaiveDate,
}

/// A holding of an instrument: share count, average entry price in the
/// instrument's currency, and the FX rate in effect at entry expressed as
/// base-currency units per one native unit.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub instrument_id: String,
    #[serde(with = "decimal_serde")]
    pub quantity: Decimal,
    #[serde(with = "decimal_serde")]
    pub average_cost: Decimal,
    #[serde(with = "decimal_serde")]
    pub entry_fx_rate: Decimal,
    pub lots: Option<Vec<PurchaseLot>>,
}

impl Position {
    pub fn new(
        instrument_id: &str,
        quantity: Decimal,
        average_cost: Decimal,
        entry_fx_rate: Decimal,
        lots: Option<Vec<PurchaseLot>>,
    ) -> Result<Self> {
        if quantity < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Negative quantity {} for instrument {}",
                quantity, instrument_id
            ))
            .into());
        }
        if entry_fx_rate <= Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Entry FX rate must be strictly positive, got {}",
                entry_fx_rate
            ))
            .into());
        }
        if let Some(lots) = &lots {
            let lot_sum: Decimal = lots.iter().map(|lot| lot.quantity).sum();
            if (lot_sum - quantity).abs() > QUANTITY_TOLERANCE {
                return Err(ValidationError::InvalidInput(format!(
                    "Lot quantities sum to {} but position quantity is {}",
                    lot_sum, quantity
                ))
                .into());
            }
        }

        Ok(Position {
            id: Uuid::new_v4().to_string(),
            instrument_id: instrument_id.to_string(),
            quantity,
            average_cost,
            entry_fx_rate,
            lots,
        })
    }

    /// Cost basis in the instrument's quote currency: lot-accurate when lots
    /// are tracked, `quantity * average_cost` otherwise.
    pub fn cost_basis_native(&self) -> Decimal {
        match &self.lots {
            Some(lots) if !lots.is_empty() => {
                lots.iter().map(|lot| lot.quantity * lot.price).sum()
            }
            _ => self.quantity * self.average_cost,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AccountClass {
    Ordinary,
    Retirement,
}

/// A fixed-rate bank deposit. Valued at principal; contributes projected
/// interest income rather than market gain.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FixedDeposit {
    pub id: String,
    pub institution: String,
    #[serde(with = "decimal_serde")]
    pub amount: Decimal,
    pub currency: String,
    #[serde(with = "decimal_serde")]
    pub annual_rate_pct: Decimal,
    pub account_class: AccountClass,
    #[serde(with = "decimal_serde_option")]
    pub annual_fee: Option<Decimal>,
}

impl FixedDeposit {
    pub fn new(
        institution: &str,
        amount: Decimal,
        currency: &str,
        annual_rate_pct: Decimal,
        account_class: AccountClass,
    ) -> Result<Self> {
        if amount < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Negative deposit amount {} for {}",
                amount, institution
            ))
            .into());
        }
        if annual_rate_pct < Decimal::ZERO {
            return Err(ValidationError::InvalidInput(format!(
                "Negative interest rate {} for {}",
                annual_rate_pct, institution
            ))
            .into());
        }

        Ok(FixedDeposit {
            id: Uuid::new_v4().to_string(),
            institution: institution.to_string(),
            amount,
            currency: currency.to_string(),
            annual_rate_pct,
            account_class,
            annual_fee: None,
        })
    }

    /// Projected interest for the coming year in the deposit's own currency,
    /// net of the annual fee when one is charged.
    pub fn projected_annual_interest(&self) -> Decimal {
        let gross = self.amount * self.annual_rate_pct / Decimal::ONE_HUNDRED;
        gross - self.annual_fee.unwrap_or(Decimal::ZERO)
    }
}

/// Portfolio-wide totals in the base currency.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioTotals {
    pub base_currency: String,
    pub as_of_date: NaiveDate,
    #[serde(with = "decimal_serde")]
    pub market_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub cost_basis: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_gain: Decimal,
    #[serde(with = "decimal_serde")]
    pub total_gain_pct: Decimal,
    #[serde(with = "decimal_serde")]
    pub day_change: Decimal,
    #[serde(with = "decimal_serde")]
    pub deposit_value: Decimal,
    #[serde(with = "decimal_serde")]
    pub projected_dividend_income: Decimal,
    #[serde(with = "decimal_serde")]
    pub projected_interest_income: Decimal,
    #[serde(with = "decimal_serde")]
    pub projected_income: Decimal,
}
