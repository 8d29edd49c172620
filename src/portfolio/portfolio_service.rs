use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::Instrument;
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::fx::{convert, ExchangeRateTable, RateProviderTrait};
use crate::market_data::MarketDataProviderTrait;
use crate::portfolio::income::project_annual_income;
use crate::portfolio::portfolio_model::{FixedDeposit, PortfolioTotals, Position};
use crate::portfolio::portfolio_traits::PortfolioStoreTrait;
use crate::portfolio::valuation::{valuate, ValuedPosition};

/// One full valuation pass: every position valued plus the portfolio totals.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub positions: Vec<ValuedPosition>,
    pub totals: PortfolioTotals,
}

fn percent_of(gain: Decimal, basis: Decimal) -> Decimal {
    if basis.is_zero() {
        Decimal::ZERO
    } else {
        gain / basis * Decimal::ONE_HUNDRED
    }
}

/// Values every position and deposit against the given instrument catalog
/// and rate snapshot. Positions whose instrument is missing from the catalog
/// are dropped from all aggregates; that is a transient consistency gap, not
/// an error.
pub fn aggregate(
    positions: &[Position],
    instruments: &HashMap<String, Instrument>,
    deposits: &[FixedDeposit],
    rates: &ExchangeRateTable,
    as_of: NaiveDate,
) -> PortfolioSnapshot {
    let base = rates.base_currency();

    let mut valued_positions = Vec::with_capacity(positions.len());
    let mut dividend_income = Decimal::ZERO;
    for position in positions {
        let Some(instrument) = instruments.get(&position.instrument_id) else {
            warn!(
                "No instrument {} for position {}, dropped from aggregates",
                position.instrument_id, position.id
            );
            continue;
        };
        dividend_income += project_annual_income(position, instrument, rates);
        valued_positions.push(valuate(position, instrument, rates));
    }

    let equity_value: Decimal = valued_positions.iter().map(|p| p.market_value.base).sum();
    let equity_cost: Decimal = valued_positions.iter().map(|p| p.cost_basis.base).sum();
    let day_change: Decimal = valued_positions.iter().map(|p| p.day_change.base).sum();

    let mut deposit_value = Decimal::ZERO;
    let mut interest_income = Decimal::ZERO;
    for deposit in deposits {
        deposit_value += convert(deposit.amount, &deposit.currency, base, rates);
        interest_income += convert(
            deposit.projected_annual_interest(),
            &deposit.currency,
            base,
            rates,
        );
    }

    // Deposits are carried at principal: they add value and cost basis in
    // equal measure and contribute income, not gain.
    let market_value = equity_value + deposit_value;
    let cost_basis = equity_cost + deposit_value;
    let total_gain = market_value - cost_basis;

    debug!(
        "Aggregated {} positions and {} deposits into totals ({} {})",
        valued_positions.len(),
        deposits.len(),
        market_value.round_dp(DISPLAY_DECIMAL_PRECISION),
        base
    );

    PortfolioSnapshot {
        positions: valued_positions,
        totals: PortfolioTotals {
            base_currency: base.to_string(),
            as_of_date: as_of,
            market_value,
            cost_basis,
            total_gain,
            total_gain_pct: percent_of(total_gain, cost_basis),
            day_change,
            deposit_value,
            projected_dividend_income: dividend_income,
            projected_interest_income: interest_income,
            projected_income: dividend_income + interest_income,
        },
    }
}

/// Composition root over the collaborator contracts: pulls the stored
/// records, refreshes prices and rates fail-softly, and runs the pure
/// aggregation.
pub struct PortfolioService {
    store: Arc<dyn PortfolioStoreTrait>,
    market_data: Arc<dyn MarketDataProviderTrait>,
    rate_provider: Arc<dyn RateProviderTrait>,
}

impl PortfolioService {
    pub fn new(
        store: Arc<dyn PortfolioStoreTrait>,
        market_data: Arc<dyn MarketDataProviderTrait>,
        rate_provider: Arc<dyn RateProviderTrait>,
    ) -> Self {
        PortfolioService {
            store,
            market_data,
            rate_provider,
        }
    }

    pub fn snapshot(&self, as_of: NaiveDate) -> Result<PortfolioSnapshot> {
        let mut instruments = self.store.get_instruments()?;
        let positions = self.store.get_positions()?;
        let deposits = self.store.get_fixed_deposits()?;

        let symbols: Vec<String> = instruments.iter().map(|i| i.symbol.clone()).collect();
        let quotes = match self.market_data.latest_quotes(&symbols) {
            Ok(quotes) => quotes,
            Err(e) => {
                warn!("Quote refresh failed ({}), keeping stored prices", e);
                HashMap::new()
            }
        };
        for instrument in instruments.iter_mut() {
            match quotes.get(&instrument.symbol) {
                Some(quote) => {
                    instrument.current_price = quote.price;
                    instrument.previous_close =
                        quote.previous_close.or(instrument.previous_close);
                }
                None => warn!(
                    "No fresh quote for {}, keeping stored price",
                    instrument.symbol
                ),
            }
        }

        let rates = match self.rate_provider.latest_rates() {
            Ok(rates) => rates,
            Err(e) => {
                warn!("Rate refresh failed ({}), using fallback table", e);
                ExchangeRateTable::fallback()
            }
        };

        let catalog: HashMap<String, Instrument> = instruments
            .into_iter()
            .map(|instrument| (instrument.id.clone(), instrument))
            .collect();

        Ok(aggregate(&positions, &catalog, &deposits, &rates, as_of))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCategory;
    use crate::portfolio::portfolio_model::AccountClass;
    use rust_decimal_macros::dec;

    fn catalog(instruments: Vec<Instrument>) -> HashMap<String, Instrument> {
        instruments
            .into_iter()
            .map(|i| (i.id.clone(), i))
            .collect()
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 6).unwrap()
    }

    #[test]
    fn test_missing_instrument_is_dropped_silently() {
        let mut instrument =
            Instrument::new("AAPL", "Apple", AssetCategory::Equity, "USD", dec!(200)).unwrap();
        instrument.previous_close = Some(dec!(198));
        let held = Position::new(&instrument.id, dec!(2), dec!(150), dec!(1), None).unwrap();
        let orphan = Position::new("gone", dec!(10), dec!(50), dec!(1), None).unwrap();

        let rates = ExchangeRateTable::new("USD");
        let snapshot = aggregate(
            &[held, orphan],
            &catalog(vec![instrument]),
            &[],
            &rates,
            as_of(),
        );

        assert_eq!(snapshot.positions.len(), 1);
        assert_eq!(snapshot.totals.market_value, dec!(400));
        assert_eq!(snapshot.totals.cost_basis, dec!(300));
        assert_eq!(snapshot.totals.day_change, dec!(4));
    }

    #[test]
    fn test_deposits_add_value_and_income_but_not_gain() {
        let instrument =
            Instrument::new("AAPL", "Apple", AssetCategory::Equity, "USD", dec!(200)).unwrap();
        let position = Position::new(&instrument.id, dec!(1), dec!(100), dec!(1), None).unwrap();
        let deposit = FixedDeposit::new(
            "First Bank",
            dec!(9000),
            "EUR",
            dec!(2),
            AccountClass::Retirement,
        )
        .unwrap();

        let rates = ExchangeRateTable::new("USD").with_rate("EUR", dec!(0.9));
        let snapshot = aggregate(
            &[position],
            &catalog(vec![instrument]),
            &[deposit],
            &rates,
            as_of(),
        );

        // 9000 EUR -> 10000 USD principal, 180 EUR -> 200 USD interest
        assert_eq!(snapshot.totals.deposit_value, dec!(10000));
        assert_eq!(snapshot.totals.projected_interest_income, dec!(200));
        assert_eq!(snapshot.totals.market_value, dec!(10200));
        assert_eq!(snapshot.totals.total_gain, dec!(100));
        assert_eq!(snapshot.totals.projected_income, dec!(200));
    }

    #[test]
    fn test_empty_portfolio_totals_are_zero() {
        let rates = ExchangeRateTable::new("USD");
        let snapshot = aggregate(&[], &HashMap::new(), &[], &rates, as_of());
        assert_eq!(snapshot.totals.market_value, dec!(0));
        assert_eq!(snapshot.totals.total_gain_pct, dec!(0));
        assert!(snapshot.positions.is_empty());
    }

    struct FixedStore {
        instruments: Vec<Instrument>,
        positions: Vec<Position>,
        deposits: Vec<FixedDeposit>,
    }

    impl PortfolioStoreTrait for FixedStore {
        fn get_instruments(&self) -> Result<Vec<Instrument>> {
            Ok(self.instruments.clone())
        }
        fn get_positions(&self) -> Result<Vec<Position>> {
            Ok(self.positions.clone())
        }
        fn get_fixed_deposits(&self) -> Result<Vec<FixedDeposit>> {
            Ok(self.deposits.clone())
        }
    }

    struct NoQuotes;
    impl MarketDataProviderTrait for NoQuotes {
        fn latest_quote(&self, symbol: &str) -> Result<crate::market_data::Quote> {
            Err(crate::errors::Error::MarketData(format!(
                "no quote for {}",
                symbol
            )))
        }
        fn latest_quotes(
            &self,
            _symbols: &[String],
        ) -> Result<HashMap<String, crate::market_data::Quote>> {
            Ok(HashMap::new())
        }
    }

    struct NoRates;
    impl RateProviderTrait for NoRates {
        fn latest_rates(&self) -> Result<ExchangeRateTable> {
            Err(crate::errors::Error::MarketData("rates unreachable".to_string()))
        }
    }

    #[test]
    fn test_service_degrades_to_stored_prices_and_fallback_rates() {
        let instrument =
            Instrument::new("VOD.L", "Vodafone", AssetCategory::Equity, "GBp", dec!(70))
                .unwrap();
        let position = Position::new(&instrument.id, dec!(100), dec!(70), dec!(1.25), None).unwrap();
        let service = PortfolioService::new(
            Arc::new(FixedStore {
                instruments: vec![instrument],
                positions: vec![position],
                deposits: vec![],
            }),
            Arc::new(NoQuotes),
            Arc::new(NoRates),
        );

        let snapshot = service.snapshot(as_of()).unwrap();
        assert_eq!(snapshot.positions.len(), 1);
        // Stored price survives; fallback table (GBP at 0.79) prices the value
        let value = snapshot.positions[0].market_value.base;
        assert!((value - dec!(70) / dec!(0.79)).abs() < dec!(0.0001));
    }
}
