use chrono::NaiveDate;
use moneta_core::assets::{AssetCategory, DividendFrequency, DividendInfo, Instrument};
use moneta_core::fx::ExchangeRateTable;
use moneta_core::portfolio::portfolio_model::{AccountClass, FixedDeposit, Position};
use moneta_core::portfolio::portfolio_service::aggregate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, 6).unwrap()
}

/// 10 shares bought at 100 in a foreign currency with entry rate 1.10; the
/// instrument now trades at 120 with the currency at 1.20 base units. The
/// base-currency gain of 340 must split into 220 of market movement and 120
/// of currency movement.
#[test]
fn gain_splits_into_market_and_fx_components() {
    let mut instrument =
        Instrument::new("ASML.AS", "ASML Holding", AssetCategory::Equity, "EUR", dec!(120))
            .unwrap();
    instrument.previous_close = Some(dec!(120));
    let position = Position::new(&instrument.id, dec!(10), dec!(100), dec!(1.10), None).unwrap();

    // 1.20 base units per euro means 1/1.2 euros per base unit
    let rates = ExchangeRateTable::new("USD").with_rate("EUR", Decimal::ONE / dec!(1.2));
    let catalog: HashMap<String, Instrument> =
        [(instrument.id.clone(), instrument)].into_iter().collect();

    let snapshot = aggregate(&[position], &catalog, &[], &rates, as_of());
    let valued = &snapshot.positions[0];

    let close = |left: Decimal, right: Decimal| (left - right).abs() < dec!(0.0001);
    assert!(close(valued.cost_basis.base, dec!(1100)));
    assert!(close(valued.market_value.base, dec!(1440)));
    assert!(close(valued.market_impact, dec!(220)));
    assert!(close(valued.fx_impact, dec!(120)));
    assert!(close(valued.total_gain.base, dec!(340)));
    assert!(close(
        valued.market_impact + valued.fx_impact,
        valued.total_gain.base
    ));
    assert!(close(snapshot.totals.total_gain, dec!(340)));
}

#[test]
fn totals_combine_positions_deposits_and_income() {
    let mut payer =
        Instrument::new("KO", "Coca-Cola", AssetCategory::Equity, "USD", dec!(60)).unwrap();
    payer.previous_close = Some(dec!(59));
    payer = payer.with_dividend(DividendInfo {
        amount_per_payment: Some(dec!(0.50)),
        frequency: Some(DividendFrequency::Quarterly),
        pay_date: Some(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()),
        ..Default::default()
    });
    let position = Position::new(&payer.id, dec!(100), dec!(50), dec!(1), None).unwrap();

    let deposit = FixedDeposit::new(
        "First Bank",
        dec!(5000),
        "USD",
        dec!(4),
        AccountClass::Ordinary,
    )
    .unwrap();

    let rates = ExchangeRateTable::new("USD");
    let catalog: HashMap<String, Instrument> = [(payer.id.clone(), payer)].into_iter().collect();
    let snapshot = aggregate(&[position], &catalog, &[deposit], &rates, as_of());

    // 100 shares at 60 plus the 5000 principal
    assert_eq!(snapshot.totals.market_value, dec!(11000));
    assert_eq!(snapshot.totals.cost_basis, dec!(10000));
    assert_eq!(snapshot.totals.total_gain, dec!(1000));
    assert_eq!(snapshot.totals.total_gain_pct, dec!(10));
    assert_eq!(snapshot.totals.day_change, dec!(100));
    // 0.50 x 4 x 100 shares of dividends, 4% on the deposit
    assert_eq!(snapshot.totals.projected_dividend_income, dec!(200));
    assert_eq!(snapshot.totals.projected_interest_income, dec!(200));
    assert_eq!(snapshot.totals.projected_income, dec!(400));
}

#[test]
fn snapshot_serializes_for_the_ui() {
    let instrument =
        Instrument::new("AAPL", "Apple", AssetCategory::Equity, "USD", dec!(200)).unwrap();
    let position = Position::new(&instrument.id, dec!(2), dec!(150), dec!(1), None).unwrap();
    let rates = ExchangeRateTable::new("USD");
    let catalog: HashMap<String, Instrument> =
        [(instrument.id.clone(), instrument)].into_iter().collect();

    let snapshot = aggregate(&[position], &catalog, &[], &rates, as_of());
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["totals"]["baseCurrency"], "USD");
    assert_eq!(json["totals"]["marketValue"], "400");
    assert_eq!(json["positions"][0]["instrument"]["symbol"], "AAPL");
}
