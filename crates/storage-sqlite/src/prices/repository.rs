use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use valuator_core::prices::{PricePoint, PriceRepositoryTrait};
use valuator_core::Result;

use super::model::NewPriceDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{asset_prices, assets};
use crate::utils::{
    chunk_for_sqlite, date_to_db, decimal_from_db, load_asset_ids, resolve_asset_id,
};

pub struct PriceRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PriceRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl PriceRepositoryTrait for PriceRepository {
    fn get_price(&self, asset_name: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        let mut conn = get_connection(&self.pool)?;

        let price = asset_prices::table
            .inner_join(assets::table)
            .filter(assets::asset_name.eq(asset_name))
            .filter(asset_prices::date.eq(date_to_db(date)))
            .select(asset_prices::price)
            .first::<String>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        price.as_deref().map(decimal_from_db).transpose()
    }

    /// All prices recorded on `date`, keyed by asset name. One query per day.
    fn get_prices_on_date(&self, date: NaiveDate) -> Result<HashMap<String, Decimal>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = asset_prices::table
            .inner_join(assets::table)
            .filter(asset_prices::date.eq(date_to_db(date)))
            .select((assets::asset_name, asset_prices::price))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|(name, price)| Ok((name, decimal_from_db(&price)?)))
            .collect()
    }

    async fn create_many(&self, prices: Vec<PricePoint>) -> Result<usize> {
        for point in &prices {
            point.validate()?;
        }

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let asset_ids = load_asset_ids(conn)?;
                let rows = prices
                    .iter()
                    .map(|p| {
                        resolve_asset_id(&asset_ids, &p.asset_name)
                            .map(|asset_id| NewPriceDB::from_domain(p, asset_id))
                    })
                    .collect::<Result<Vec<_>>>()?;

                let mut inserted = 0;
                for chunk in chunk_for_sqlite(&rows) {
                    inserted += diesel::insert_into(asset_prices::table)
                        .values(chunk)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                debug!("Inserted {} price rows", inserted);
                Ok(inserted)
            })
            .await
    }

    async fn delete_all(&self) -> Result<usize> {
        self.writer
            .exec(|conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(asset_prices::table)
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
