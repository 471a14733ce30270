use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use valuator_core::assets::{Asset, AssetRepositoryTrait, NewAsset};
use valuator_core::Result;

use super::model::{AssetDB, NewAssetDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::assets;

/// Repository for managing asset data in the database
pub struct AssetRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl AssetRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AssetRepositoryTrait for AssetRepository {
    /// Lists all assets ordered by id, i.e. insertion order.
    fn list(&self) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;

        let results = assets::table
            .select(AssetDB::as_select())
            .order(assets::id.asc())
            .load::<AssetDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(results.into_iter().map(Asset::from).collect())
    }

    fn get_by_name(&self, name: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        let result = assets::table
            .select(AssetDB::as_select())
            .filter(assets::asset_name.eq(name))
            .first::<AssetDB>(&mut conn)
            .map_err(StorageError::from)?;

        Ok(result.into())
    }

    async fn create_many(&self, new_assets: Vec<NewAsset>) -> Result<Vec<Asset>> {
        for asset in &new_assets {
            asset.validate()?;
        }
        let rows: Vec<NewAssetDB> = new_assets.into_iter().map(NewAssetDB::from).collect();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Vec<Asset>> {
                let mut created = Vec::with_capacity(rows.len());
                for row in &rows {
                    let asset_db = diesel::insert_into(assets::table)
                        .values(row)
                        .returning(AssetDB::as_returning())
                        .get_result::<AssetDB>(conn)
                        .map_err(StorageError::from)?;
                    created.push(asset_db.into());
                }
                Ok(created)
            })
            .await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(assets::table)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
