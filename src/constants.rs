use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Base currency assumed when none is configured
pub const DEFAULT_BASE_CURRENCY: &str = "USD";

/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Tolerance when reconciling a position's quantity against its lot sum
pub const QUANTITY_TOLERANCE: Decimal = dec!(0.00000001);

/// Share of a world/global-labeled fund's value attributed to the US when
/// estimating look-through country exposure. A modeling assumption, not a
/// derived fact; overridable via `risk::RiskOptions`.
pub const WORLD_TO_US_BLEND: Decimal = dec!(0.60);

/// Maximum number of explicit dividend payment dates kept per instrument
pub const MAX_DIVIDEND_PAYMENT_DATES: usize = 12;
