use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use valuator_core::holdings::{HoldingRepositoryTrait, InitialHolding, NewInitialHolding};
use valuator_core::Result;

use super::model::{InitialHoldingDB, NewInitialHoldingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{asset_initials, assets};
use crate::utils::{
    chunk_for_sqlite, load_asset_ids, portfolio_id_from_db, portfolio_id_to_db, resolve_asset_id,
};

pub struct HoldingRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    fn get_initial_holding(
        &self,
        asset_name: &str,
        portfolio_id: u32,
    ) -> Result<Option<InitialHolding>> {
        let db_portfolio_id = portfolio_id_to_db(portfolio_id)?;
        let mut conn = get_connection(&self.pool)?;

        let row = asset_initials::table
            .inner_join(assets::table)
            .filter(assets::asset_name.eq(asset_name))
            .filter(asset_initials::portfolio_id.eq(db_portfolio_id))
            .select(InitialHoldingDB::as_select())
            .first::<InitialHoldingDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(|r| r.into_domain(asset_name.to_string()))
            .transpose()
    }

    /// Holdings of one portfolio, in asset id order.
    fn list_for_portfolio(&self, portfolio_id: u32) -> Result<Vec<InitialHolding>> {
        let db_portfolio_id = portfolio_id_to_db(portfolio_id)?;
        let mut conn = get_connection(&self.pool)?;

        let rows = asset_initials::table
            .inner_join(assets::table)
            .filter(asset_initials::portfolio_id.eq(db_portfolio_id))
            .order(assets::id.asc())
            .select((InitialHoldingDB::as_select(), assets::asset_name))
            .load::<(InitialHoldingDB, String)>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|(row, name)| row.into_domain(name))
            .collect()
    }

    fn list_portfolio_ids(&self) -> Result<Vec<u32>> {
        let mut conn = get_connection(&self.pool)?;

        let ids = asset_initials::table
            .select(asset_initials::portfolio_id)
            .distinct()
            .order(asset_initials::portfolio_id.asc())
            .load::<i32>(&mut conn)
            .map_err(StorageError::from)?;

        ids.into_iter().map(portfolio_id_from_db).collect()
    }

    async fn create_many(&self, holdings: Vec<NewInitialHolding>) -> Result<usize> {
        for holding in &holdings {
            holding.validate()?;
        }

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let asset_ids = load_asset_ids(conn)?;
                let rows = holdings
                    .iter()
                    .map(|h| {
                        resolve_asset_id(&asset_ids, &h.asset_name)
                            .and_then(|asset_id| NewInitialHoldingDB::from_domain(h, asset_id))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut inserted = 0;
                for chunk in chunk_for_sqlite(&rows) {
                    inserted += diesel::insert_into(asset_initials::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(inserted)
            })
            .await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(asset_initials::table)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
