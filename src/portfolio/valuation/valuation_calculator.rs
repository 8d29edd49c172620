use log::warn;
use rust_decimal::Decimal;

use crate::assets::Instrument;
use crate::fx::currency::to_major;
use crate::fx::{rate_to_base, ExchangeRateTable};
use crate::portfolio::portfolio_model::Position;
use crate::portfolio::valuation::valuation_model::{MonetaryValue, ValuedPosition};

/// Currencies whose unit has always traded above one US dollar. Used only by
/// the entry-rate repair heuristic.
const ALWAYS_ABOVE_USD: &[&str] = &["GBP", "KWD", "BHD", "OMR", "JOD"];

fn currency_always_above(currency: &str, base: &str) -> bool {
    match base {
        "USD" => ALWAYS_ABOVE_USD.contains(&currency),
        _ => false,
    }
}

/// Repairs a stored entry FX rate that looks inverted: legacy records are
/// known to sometimes hold "native per base" instead of "base per native".
/// A rate below 1 for a currency that always trades above the base cannot be
/// right, so the reciprocal is taken. Best-effort, not a guarantee; callers
/// can disable it via `ValuationOptions`.
pub fn repair_entry_fx_rate(rate: Decimal, currency: &str, base: &str) -> (Decimal, bool) {
    if rate > Decimal::ZERO && rate < Decimal::ONE && currency_always_above(currency, base) {
        warn!(
            "Entry FX rate {} for {} against {} looks inverted, using reciprocal",
            rate, currency, base
        );
        (Decimal::ONE / rate, true)
    } else {
        (rate, false)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ValuationOptions {
    /// Apply the inverted-entry-rate repair heuristic
    pub repair_entry_fx_rate: bool,
}

impl Default for ValuationOptions {
    fn default() -> Self {
        ValuationOptions {
            repair_entry_fx_rate: true,
        }
    }
}

/// Percentage with the divide-by-zero guard: a zero basis yields 0, not an
/// error, so a freshly opened or fully written-off record still renders.
fn percent_of(gain: Decimal, basis: Decimal) -> Decimal {
    if basis.is_zero() {
        Decimal::ZERO
    } else {
        gain / basis * Decimal::ONE_HUNDRED
    }
}

pub fn valuate(
    position: &Position,
    instrument: &Instrument,
    rates: &ExchangeRateTable,
) -> ValuedPosition {
    valuate_with_options(position, instrument, rates, ValuationOptions::default())
}

/// Values one position against its instrument's current quote and the rate
/// snapshot, decomposing the base-currency gain into a market component and
/// an FX component.
pub fn valuate_with_options(
    position: &Position,
    instrument: &Instrument,
    rates: &ExchangeRateTable,
    options: ValuationOptions,
) -> ValuedPosition {
    let quantity = position.quantity;
    let base = rates.base_currency();

    // Native amounts, normalized out of any minor-unit quotation before FX
    let (current_value, local_currency) =
        to_major(quantity * instrument.current_price, &instrument.currency);
    let (cost_basis, _) = to_major(position.cost_basis_native(), &instrument.currency);

    let current_fx = rate_to_base(local_currency, rates);

    let (entry_fx, fx_rate_repaired) = if local_currency == base {
        (Decimal::ONE, false)
    } else if options.repair_entry_fx_rate {
        repair_entry_fx_rate(position.entry_fx_rate, local_currency, base)
    } else {
        (position.entry_fx_rate, false)
    };

    let market_value_base = current_value * current_fx;
    let cost_basis_base = cost_basis * entry_fx;
    let total_gain_base = market_value_base - cost_basis_base;

    // What today's native value would be worth had the rate never moved
    // since entry; the remainder of the gain is pure currency effect.
    let value_at_entry_fx = current_value * entry_fx;
    let fx_impact = market_value_base - value_at_entry_fx;
    let market_impact = value_at_entry_fx - cost_basis_base;

    let (day_change, day_change_pct) = match instrument.previous_close {
        Some(previous_close) => {
            let (change, _) = to_major(
                (instrument.current_price - previous_close) * quantity,
                &instrument.currency,
            );
            let (prev_value, _) = to_major(previous_close * quantity, &instrument.currency);
            (
                MonetaryValue {
                    local: change,
                    // Today's move is converted at the current rate, not the
                    // entry rate.
                    base: change * current_fx,
                },
                percent_of(change, prev_value),
            )
        }
        None => {
            warn!(
                "No previous close for {}, day change reported as zero",
                instrument.symbol
            );
            (MonetaryValue::zero(), Decimal::ZERO)
        }
    };

    ValuedPosition {
        position_id: position.id.clone(),
        instrument: instrument.clone(),
        base_currency: base.to_string(),
        local_currency: local_currency.to_string(),
        quantity,
        price: instrument.current_price,
        market_value: MonetaryValue {
            local: current_value,
            base: market_value_base,
        },
        cost_basis: MonetaryValue {
            local: cost_basis,
            base: cost_basis_base,
        },
        total_gain: MonetaryValue {
            local: current_value - cost_basis,
            base: total_gain_base,
        },
        total_gain_pct: percent_of(total_gain_base, cost_basis_base),
        day_change,
        day_change_pct,
        market_impact,
        fx_impact,
        fx_rate: current_fx,
        entry_fx_rate: entry_fx,
        fx_rate_repaired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCategory;
    use rust_decimal_macros::dec;

    fn instrument(currency: &str, price: Decimal, previous_close: Option<Decimal>) -> Instrument {
        let mut inst =
            Instrument::new("TEST", "Test Instrument", AssetCategory::Equity, currency, price)
                .unwrap();
        inst.previous_close = previous_close;
        inst
    }

    #[test]
    fn test_gain_decomposition_scenario() {
        // 10 shares bought at 100 EUR with entry rate 1.10, now 120 EUR with
        // the euro worth 1.25 base units.
        let position = Position::new("i", dec!(10), dec!(100), dec!(1.10), None).unwrap();
        let inst = instrument("EUR", dec!(120), Some(dec!(118)));
        let rates = ExchangeRateTable::new("USD").with_rate("EUR", dec!(0.8));

        let valued = valuate(&position, &inst, &rates);

        assert_eq!(valued.cost_basis.base, dec!(1100));
        assert_eq!(valued.market_value.base, dec!(1500));
        assert_eq!(valued.market_impact, dec!(220));
        assert_eq!(valued.fx_impact, dec!(180));
        assert_eq!(valued.total_gain.base, dec!(400));
        assert!(!valued.fx_rate_repaired);
    }

    #[test]
    fn test_decomposition_identity_holds() {
        let position = Position::new("i", dec!(7), dec!(31.5), dec!(1.31), None).unwrap();
        let inst = instrument("GBP", dec!(29.8), Some(dec!(30.1)));
        let rates = ExchangeRateTable::new("USD").with_rate("GBP", dec!(0.78));

        let valued = valuate(&position, &inst, &rates);
        let residue = valued.market_impact + valued.fx_impact - valued.total_gain.base;
        assert!(residue.abs() < dec!(0.000001));
    }

    #[test]
    fn test_no_fx_movement_means_zero_fx_impact() {
        let position = Position::new("i", dec!(5), dec!(40), dec!(1.25), None).unwrap();
        let inst = instrument("GBP", dec!(50), None);
        let rates = ExchangeRateTable::new("USD").with_rate("GBP", dec!(0.8));

        let valued = valuate(&position, &inst, &rates);
        assert_eq!(valued.fx_impact, dec!(0));
        assert_eq!(valued.market_impact, valued.total_gain.base);
    }

    #[test]
    fn test_base_currency_instrument_ignores_entry_rate() {
        let position = Position::new("i", dec!(3), dec!(200), dec!(1.5), None).unwrap();
        let inst = instrument("USD", dec!(210), Some(dec!(205)));
        let rates = ExchangeRateTable::new("USD");

        let valued = valuate(&position, &inst, &rates);
        assert_eq!(valued.entry_fx_rate, dec!(1));
        assert_eq!(valued.cost_basis.base, dec!(600));
        assert_eq!(valued.fx_impact, dec!(0));
        assert_eq!(valued.day_change.base, dec!(15));
    }

    #[test]
    fn test_pence_quoted_instrument_is_normalized() {
        // 200 shares at 450p = 900 GBP
        let position = Position::new("i", dec!(200), dec!(400), dec!(1.25), None).unwrap();
        let inst = instrument("GBp", dec!(450), Some(dec!(445)));
        let rates = ExchangeRateTable::new("USD").with_rate("GBP", dec!(0.8));

        let valued = valuate(&position, &inst, &rates);
        assert_eq!(valued.local_currency, "GBP");
        assert_eq!(valued.market_value.local, dec!(900));
        assert_eq!(valued.market_value.base, dec!(1125));
        // Cost basis 200 * 400p = 800 GBP at entry rate 1.25
        assert_eq!(valued.cost_basis.base, dec!(1000));
        assert_eq!(valued.day_change.local, dec!(10));
    }

    #[test]
    fn test_inverted_entry_rate_is_repaired() {
        // Sterling never trades below one dollar; 0.8 must be an inverted
        // legacy record.
        let position = Position::new("i", dec!(10), dec!(20), dec!(0.8), None).unwrap();
        let inst = instrument("GBP", dec!(22), None);
        let rates = ExchangeRateTable::new("USD").with_rate("GBP", dec!(0.8));

        let valued = valuate(&position, &inst, &rates);
        assert!(valued.fx_rate_repaired);
        assert_eq!(valued.entry_fx_rate, dec!(1.25));
        assert_eq!(valued.cost_basis.base, dec!(250));
    }

    #[test]
    fn test_known_good_entry_rate_untouched() {
        let position = Position::new("i", dec!(10), dec!(20), dec!(1.27), None).unwrap();
        let inst = instrument("GBP", dec!(22), None);
        let rates = ExchangeRateTable::new("USD").with_rate("GBP", dec!(0.8));

        let valued = valuate(&position, &inst, &rates);
        assert!(!valued.fx_rate_repaired);
        assert_eq!(valued.entry_fx_rate, dec!(1.27));
    }

    #[test]
    fn test_repair_can_be_disabled() {
        let position = Position::new("i", dec!(10), dec!(20), dec!(0.8), None).unwrap();
        let inst = instrument("GBP", dec!(22), None);
        let rates = ExchangeRateTable::new("USD").with_rate("GBP", dec!(0.8));

        let valued = valuate_with_options(
            &position,
            &inst,
            &rates,
            ValuationOptions {
                repair_entry_fx_rate: false,
            },
        );
        assert!(!valued.fx_rate_repaired);
        assert_eq!(valued.entry_fx_rate, dec!(0.8));
    }

    #[test]
    fn test_repair_leaves_weak_currencies_alone() {
        // 0.92 is a perfectly plausible euro entry rate
        let (rate, repaired) = repair_entry_fx_rate(dec!(0.92), "EUR", "USD");
        assert!(!repaired);
        assert_eq!(rate, dec!(0.92));
    }

    #[test]
    fn test_zero_cost_basis_yields_zero_percent() {
        let position = Position::new("i", dec!(0), dec!(0), dec!(1), None).unwrap();
        let inst = instrument("USD", dec!(10), Some(dec!(9)));
        let rates = ExchangeRateTable::new("USD");

        let valued = valuate(&position, &inst, &rates);
        assert_eq!(valued.total_gain_pct, dec!(0));
        assert_eq!(valued.market_value.base, dec!(0));
    }

    #[test]
    fn test_lot_history_drives_cost_basis() {
        use crate::portfolio::portfolio_model::PurchaseLot;
        use chrono::NaiveDate;

        let lots = vec![
            PurchaseLot {
                quantity: dec!(5),
                price: dec!(80),
                date: NaiveDate::from_ymd_opt(2023, 3, 1).unwrap(),
            },
            PurchaseLot {
                quantity: dec!(5),
                price: dec!(120),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            },
        ];
        let position = Position::new("i", dec!(10), dec!(100), dec!(1), Some(lots)).unwrap();
        let inst = instrument("USD", dec!(130), None);
        let rates = ExchangeRateTable::new("USD");

        let valued = valuate(&position, &inst, &rates);
        assert_eq!(valued.cost_basis.base, dec!(1000));
        assert_eq!(valued.total_gain.base, dec!(300));
    }
}
