/// Decimal places kept for per-asset and total market values
pub const VALUE_DECIMAL_PRECISION: u32 = 2;

/// Decimal places kept for asset weights
pub const WEIGHT_DECIMAL_PRECISION: u32 = 4;

/// Decimal places kept for seeded initial quantities
pub const QUANTITY_DECIMAL_PRECISION: u32 = 8;

/// Portfolios valued when the caller does not name any
pub const DEFAULT_PORTFOLIO_IDS: [u32; 2] = [1, 2];

/// Notional value every seeded portfolio starts with
pub const INITIAL_PORTFOLIO_VALUE: i64 = 1_000_000_000;

/// Wire format for calendar dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";
