pub mod session_model;
pub mod session_service;

pub use session_model::MarketSession;
pub use session_service::estimate;
