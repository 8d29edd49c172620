use log::warn;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::DEFAULT_BASE_CURRENCY;

/// A snapshot of exchange rates against a single base (reference) currency.
///
/// Each entry maps a currency code to the number of units of that currency
/// per 1 unit of the base currency. The identity entry for the base currency
/// is always present. The table is supplied by an external rate provider and
/// treated as immutable for the duration of a calculation pass.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRateTable {
    base_currency: String,
    rates: HashMap<String, Decimal>,
}

impl ExchangeRateTable {
    pub fn new(base_currency: &str) -> Self {
        let mut rates = HashMap::new();
        rates.insert(base_currency.to_string(), Decimal::ONE);
        ExchangeRateTable {
            base_currency: base_currency.to_string(),
            rates,
        }
    }

    /// Adds a rate entry (units of `currency` per 1 base unit). Non-positive
    /// rates are skipped rather than stored, so a partially bad snapshot
    /// still serves the remaining currencies.
    pub fn with_rate(mut self, currency: &str, units_per_base: Decimal) -> Self {
        if units_per_base <= Decimal::ZERO {
            warn!(
                "Ignoring non-positive rate {} for {} (base {})",
                units_per_base, currency, self.base_currency
            );
            return self;
        }
        self.rates.insert(currency.to_string(), units_per_base);
        self
    }

    pub fn from_rates<I>(base_currency: &str, rates: I) -> Self
    where
        I: IntoIterator<Item = (String, Decimal)>,
    {
        let mut table = ExchangeRateTable::new(base_currency);
        for (currency, rate) in rates {
            table = table.with_rate(&currency, rate);
        }
        table
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    /// Units of `currency` per 1 base unit, if the snapshot has the entry.
    pub fn rate(&self, currency: &str) -> Option<Decimal> {
        self.rates.get(currency).copied()
    }

    pub fn contains(&self, currency: &str) -> bool {
        self.rates.contains_key(currency)
    }

    /// Static last-resort snapshot used when no rate provider is reachable.
    /// Approximate by construction; callers get a number, not an error.
    pub fn fallback() -> Self {
        ExchangeRateTable::new(DEFAULT_BASE_CURRENCY)
            .with_rate("EUR", dec!(0.92))
            .with_rate("GBP", dec!(0.79))
            .with_rate("JPY", dec!(150.0))
            .with_rate("CHF", dec!(0.88))
            .with_rate("CAD", dec!(1.36))
            .with_rate("AUD", dec!(1.52))
            .with_rate("HKD", dec!(7.80))
            .with_rate("INR", dec!(83.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_entry_always_present() {
        let table = ExchangeRateTable::new("USD");
        assert_eq!(table.rate("USD"), Some(Decimal::ONE));
    }

    #[test]
    fn test_non_positive_rates_are_skipped() {
        let table = ExchangeRateTable::new("USD")
            .with_rate("EUR", dec!(0))
            .with_rate("GBP", dec!(-1.2));
        assert!(!table.contains("EUR"));
        assert!(!table.contains("GBP"));
    }

    #[test]
    fn test_fallback_has_base_identity() {
        let table = ExchangeRateTable::fallback();
        assert_eq!(table.base_currency(), "USD");
        assert_eq!(table.rate("USD"), Some(Decimal::ONE));
        assert!(table.contains("JPY"));
    }
}
