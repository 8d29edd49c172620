pub mod income;
pub mod portfolio_model;
pub mod portfolio_service;
pub mod portfolio_traits;
pub mod valuation;

pub use portfolio_model::*;
pub use portfolio_service::*;
pub use portfolio_traits::*;
