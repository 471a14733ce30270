//! SQLite storage implementation for initial holdings.

mod model;
mod repository;

pub use model::{InitialHoldingDB, NewInitialHoldingDB};
pub use repository::HoldingRepository;
