use crate::assets::Instrument;
use crate::errors::Result;
use crate::portfolio::portfolio_model::{FixedDeposit, Position};

/// Contract for the persistence layer. It stores records durably and hands
/// them back unchanged; schema evolution is its problem, not this crate's.
pub trait PortfolioStoreTrait: Send + Sync {
    fn get_instruments(&self) -> Result<Vec<Instrument>>;
    fn get_positions(&self) -> Result<Vec<Position>>;
    fn get_fixed_deposits(&self) -> Result<Vec<FixedDeposit>>;
}
