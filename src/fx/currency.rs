use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::OnceLock;

/// A quotation convention where prices are expressed in 1/100 of the
/// corresponding major currency unit (e.g. London quotes in pence).
#[derive(Debug, Clone)]
pub struct MinorUnitRule {
    pub major_code: &'static str,
    pub factor: Decimal,
    pub label: &'static str,
}

static MINOR_UNIT_RULES: OnceLock<HashMap<&'static str, MinorUnitRule>> = OnceLock::new();

fn rules() -> &'static HashMap<&'static str, MinorUnitRule> {
    MINOR_UNIT_RULES.get_or_init(|| {
        let mut map = HashMap::new();

        map.insert(
            "GBp",
            MinorUnitRule {
                major_code: "GBP",
                factor: dec!(0.01),
                label: "Pence",
            },
        );
        map.insert(
            "GBX",
            MinorUnitRule {
                major_code: "GBP",
                factor: dec!(0.01),
                label: "Pence",
            },
        );
        map.insert(
            "ZAc",
            MinorUnitRule {
                major_code: "ZAR",
                factor: dec!(0.01),
                label: "SA Cents",
            },
        );
        map.insert(
            "ZAC",
            MinorUnitRule {
                major_code: "ZAR",
                factor: dec!(0.01),
                label: "SA Cents",
            },
        );
        map.insert(
            "ILA",
            MinorUnitRule {
                major_code: "ILS",
                factor: dec!(0.01),
                label: "Agorot",
            },
        );

        map
    })
}

/// Returns the minor-unit rule for a currency code, if one exists.
pub fn minor_unit_rule(code: &str) -> Option<&'static MinorUnitRule> {
    rules().get(code)
}

/// Converts an amount from a potentially minor-unit quotation into its major
/// unit equivalent and returns the major currency code.
pub fn to_major(amount: Decimal, currency: &str) -> (Decimal, &str) {
    if let Some(rule) = minor_unit_rule(currency) {
        (amount * rule.factor, rule.major_code)
    } else {
        (amount, currency)
    }
}

/// Returns the major currency code used for rate lookups, without touching
/// the amount.
pub fn major_code(currency: &str) -> &str {
    if let Some(rule) = minor_unit_rule(currency) {
        rule.major_code
    } else {
        currency
    }
}

/// Multiplier that takes an amount expressed in the major unit back into the
/// requested (potentially minor) quotation.
pub fn from_major_multiplier(currency: &str) -> Decimal {
    if let Some(rule) = minor_unit_rule(currency) {
        Decimal::ONE / rule.factor
    } else {
        Decimal::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pence_to_major() {
        let (amount, code) = to_major(dec!(100), "GBp");
        assert_eq!(amount, dec!(1));
        assert_eq!(code, "GBP");

        let (amount, code) = to_major(dec!(250), "GBX");
        assert_eq!(amount, dec!(2.5));
        assert_eq!(code, "GBP");
    }

    #[test]
    fn test_regular_code_passes_through() {
        let (amount, code) = to_major(dec!(42.5), "EUR");
        assert_eq!(amount, dec!(42.5));
        assert_eq!(code, "EUR");
        assert_eq!(from_major_multiplier("EUR"), Decimal::ONE);
    }

    #[test]
    fn test_from_major_multiplier_inverts_factor() {
        assert_eq!(from_major_multiplier("GBp"), dec!(100));
    }
}
