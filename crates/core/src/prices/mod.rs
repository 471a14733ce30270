//! Daily asset prices.

mod prices_model;
mod prices_traits;

pub use prices_model::PricePoint;
pub use prices_traits::PriceRepositoryTrait;
