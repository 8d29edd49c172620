pub mod income_model;
pub mod income_service;

pub use income_model::ProjectedPayout;
pub use income_service::{project_annual_income, upcoming_payouts};
