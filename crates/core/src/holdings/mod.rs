//! Initial holdings - the fixed per-portfolio quantities valuation starts from.

mod holdings_model;
mod holdings_traits;

pub use holdings_model::{InitialHolding, NewInitialHolding};
pub use holdings_traits::HoldingRepositoryTrait;
