pub mod assets;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod market_data;
pub mod market_session;
pub mod portfolio;
pub mod risk;
pub mod utils;

pub use errors::{Error, Result};
pub use portfolio::*;
