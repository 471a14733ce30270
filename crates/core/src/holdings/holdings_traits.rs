use super::holdings_model::{InitialHolding, NewInitialHolding};
use crate::errors::Result;

/// Trait defining the contract for initial holding repository operations.
#[async_trait::async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    /// Returns the holding of `asset_name` in `portfolio_id`, if one exists.
    fn get_initial_holding(
        &self,
        asset_name: &str,
        portfolio_id: u32,
    ) -> Result<Option<InitialHolding>>;

    fn list_for_portfolio(&self, portfolio_id: u32) -> Result<Vec<InitialHolding>>;

    /// Distinct portfolio ids with at least one holding, ascending.
    fn list_portfolio_ids(&self) -> Result<Vec<u32>>;

    async fn create_many(&self, holdings: Vec<NewInitialHolding>) -> Result<usize>;
    async fn delete_all(&self) -> Result<usize>;
}
