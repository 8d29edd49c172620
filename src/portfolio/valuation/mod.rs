pub mod valuation_calculator;
pub mod valuation_model;

pub use valuation_calculator::{repair_entry_fx_rate, valuate, valuate_with_options, ValuationOptions};
pub use valuation_model::{MonetaryValue, ValuedPosition};
