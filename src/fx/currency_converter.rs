use log::warn;
use rust_decimal::Decimal;

use crate::fx::currency::{from_major_multiplier, major_code, to_major};
use crate::fx::fx_model::ExchangeRateTable;

/// Looks up a rate entry, degrading to 1 when the snapshot has no usable
/// entry. Missing rates are a stale-table condition, not an error; the
/// dashboard keeps rendering and the gap is logged for the observability
/// layer to surface.
fn rate_or_one(table: &ExchangeRateTable, currency: &str) -> Decimal {
    match table.rate(currency) {
        Some(rate) if rate > Decimal::ZERO => rate,
        Some(rate) => {
            warn!(
                "Unusable rate {} for {} in table (base {}), treating as 1",
                rate,
                currency,
                table.base_currency()
            );
            Decimal::ONE
        }
        None => {
            warn!(
                "No rate for {} in table (base {}), treating as 1",
                currency,
                table.base_currency()
            );
            Decimal::ONE
        }
    }
}

/// Multiplier taking 1 unit of `currency` (a major-unit code) into the base
/// currency of the table.
pub fn rate_to_base(currency: &str, table: &ExchangeRateTable) -> Decimal {
    let major = major_code(currency);
    if major == table.base_currency() {
        Decimal::ONE
    } else {
        Decimal::ONE / rate_or_one(table, major)
    }
}

/// Converts `amount` between two currency codes via the table's base
/// currency. Minor-unit quotations (e.g. pence) are normalized on the way in
/// and restored on the way out. Pure over its arguments.
pub fn convert(amount: Decimal, from: &str, to: &str, table: &ExchangeRateTable) -> Decimal {
    if from == to {
        return amount;
    }

    let (amount_major, from_major) = to_major(amount, from);
    let to_major_code = major_code(to);
    let to_multiplier = from_major_multiplier(to);

    // GBp -> GBP and the like never touch the rate table
    if from_major == to_major_code {
        return amount_major * to_multiplier;
    }

    let base = table.base_currency();
    let amount_in_base = if from_major == base {
        amount_major
    } else {
        amount_major / rate_or_one(table, from_major)
    };

    let converted = if to_major_code == base {
        amount_in_base
    } else {
        amount_in_base * rate_or_one(table, to_major_code)
    };

    converted * to_multiplier
}
