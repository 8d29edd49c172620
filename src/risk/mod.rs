pub mod risk_model;
pub mod risk_service;

pub use risk_model::{ExposureEntry, RiskAnalysis, RiskCluster, Severity};
pub use risk_service::{analyze, analyze_with_options, RiskOptions};
