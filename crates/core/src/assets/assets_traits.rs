use super::assets_model::{Asset, NewAsset};
use crate::errors::Result;

/// Trait defining the contract for Asset repository operations.
#[async_trait::async_trait]
pub trait AssetRepositoryTrait: Send + Sync {
    /// Lists the asset universe in a stable order (insertion order).
    ///
    /// Repeated calls over unchanged data must return the same order.
    fn list(&self) -> Result<Vec<Asset>>;
    fn get_by_name(&self, name: &str) -> Result<Asset>;
    async fn create_many(&self, new_assets: Vec<NewAsset>) -> Result<Vec<Asset>>;
    async fn delete_all(&self) -> Result<usize>;
}
