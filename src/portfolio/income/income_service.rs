use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::assets::{DividendFrequency, Instrument};
use crate::fx::currency::to_major;
use crate::fx::{convert, ExchangeRateTable};
use crate::portfolio::income::income_model::ProjectedPayout;
use crate::portfolio::portfolio_model::Position;

/// Total amount the position receives per payment, with the currency it is
/// paid in. None when the instrument has no usable dividend metadata.
///
/// A declared per-payment amount always wins over a trailing yield; the
/// amount is per payment per share, never per year.
fn per_payment_total(position: &Position, instrument: &Instrument) -> Option<(Decimal, String)> {
    let dividend = instrument.dividend.as_ref()?;
    let payments_per_year = Decimal::from(dividend.frequency_or_default().payments_per_year());

    if let Some(amount) = dividend.amount_per_payment {
        let total = amount * position.quantity;
        return match &dividend.dividend_currency {
            Some(currency) => Some((total, currency.clone())),
            None => {
                let (normalized, code) = to_major(total, &instrument.currency);
                Some((normalized, code.to_string()))
            }
        };
    }

    if let Some(yield_pct) = dividend.trailing_yield_pct {
        let (current_value, code) =
            to_major(position.quantity * instrument.current_price, &instrument.currency);
        let annual = current_value * yield_pct / Decimal::ONE_HUNDRED;
        return Some((annual / payments_per_year, code.to_string()));
    }

    None
}

/// Projected dividend income over the coming year, in the base currency of
/// the rate table. Missing metadata contributes zero; nothing is raised.
pub fn project_annual_income(
    position: &Position,
    instrument: &Instrument,
    rates: &ExchangeRateTable,
) -> Decimal {
    let Some(dividend) = instrument.dividend.as_ref() else {
        return Decimal::ZERO;
    };
    let payments_per_year = Decimal::from(dividend.frequency_or_default().payments_per_year());

    match per_payment_total(position, instrument) {
        Some((per_payment, currency)) => convert(
            per_payment * payments_per_year,
            &currency,
            rates.base_currency(),
            rates,
        ),
        None => Decimal::ZERO,
    }
}

/// Month offsets synthesized from a single recurring payment date.
fn recurrence_offsets(frequency: DividendFrequency) -> &'static [u32] {
    match frequency {
        DividendFrequency::Monthly => &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11],
        DividendFrequency::Quarterly => &[0, 3, 6, 9],
        DividendFrequency::SemiAnnual => &[0, 6],
        DividendFrequency::Annual | DividendFrequency::Unknown => &[0],
    }
}

/// Builds a date in the given month, walking the day down when the month is
/// shorter than the requested day.
fn clamped_date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
}

/// Expected payments on or after `as_of`, ascending by pay date.
///
/// An explicit dated schedule is surfaced as-is (future entries only). A
/// single recurring date is expanded by frequency, wrapping the month modulo
/// 12 and rolling occurrences already past into the next year. Instruments
/// with no date at all yield nothing here but still count toward the annual
/// projection.
pub fn upcoming_payouts(
    position: &Position,
    instrument: &Instrument,
    as_of: NaiveDate,
) -> Vec<ProjectedPayout> {
    let Some(dividend) = instrument.dividend.as_ref() else {
        return Vec::new();
    };
    let Some((per_payment, currency)) = per_payment_total(position, instrument) else {
        return Vec::new();
    };

    let mut payouts: Vec<ProjectedPayout> = if !dividend.payment_dates.is_empty() {
        dividend
            .payment_dates
            .iter()
            .filter(|entry| entry.pay_date >= as_of)
            .map(|entry| ProjectedPayout {
                symbol: instrument.symbol.clone(),
                pay_date: entry.pay_date,
                amount: per_payment,
                currency: currency.clone(),
            })
            .collect()
    } else {
        let Some(base_date) = dividend.pay_date.or(dividend.ex_date) else {
            return Vec::new();
        };

        recurrence_offsets(dividend.frequency_or_default())
            .iter()
            .filter_map(|offset| {
                let month = (base_date.month0() + offset) % 12 + 1;
                let candidate = clamped_date(as_of.year(), month, base_date.day())?;
                if candidate >= as_of {
                    Some(candidate)
                } else {
                    clamped_date(as_of.year() + 1, month, base_date.day())
                }
            })
            .map(|pay_date| ProjectedPayout {
                symbol: instrument.symbol.clone(),
                pay_date,
                amount: per_payment,
                currency: currency.clone(),
            })
            .collect()
    };

    payouts.sort_by_key(|payout| payout.pay_date);
    payouts
}
