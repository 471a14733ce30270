//! Helpers shared by the SQLite repositories.

use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

use crate::errors::StorageError;
use crate::schema::assets;
use valuator_core::constants::DATE_FORMAT;
use valuator_core::errors::{DatabaseError, Error, Result, ValidationError};

/// Maximum number of rows per multi-row INSERT.
///
/// SQLite caps bound parameters per statement (SQLITE_MAX_VARIABLE_NUMBER,
/// 999 on older builds); rows here bind at most four values each.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 200;

/// Chunk a slice into smaller slices for batch SQLite statements.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Decimals are stored as TEXT to keep them exact.
pub fn decimal_to_db(value: &Decimal) -> String {
    value.normalize().to_string()
}

pub fn decimal_from_db(value: &str) -> Result<Decimal> {
    Decimal::from_str(value).map_err(|e| {
        StorageError::SerializationError(format!("Invalid stored decimal '{}': {}", value, e))
            .into()
    })
}

pub fn date_to_db(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn date_from_db(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| {
        StorageError::SerializationError(format!("Invalid stored date '{}': {}", value, e))
            .into()
    })
}

/// Portfolio ids are `u32` in the domain and INTEGER (`i32`) columns here.
pub fn portfolio_id_to_db(portfolio_id: u32) -> Result<i32> {
    i32::try_from(portfolio_id).map_err(|_| {
        Error::Validation(ValidationError::InvalidInput(format!(
            "Portfolio id {} is out of range (max {})",
            portfolio_id,
            i32::MAX
        )))
    })
}

pub fn portfolio_id_from_db(value: i32) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        StorageError::SerializationError(format!("Invalid stored portfolio id {}", value)).into()
    })
}

/// Asset name -> id for every stored asset.
pub fn load_asset_ids(conn: &mut SqliteConnection) -> Result<HashMap<String, i32>> {
    let rows = assets::table
        .select((assets::asset_name, assets::id))
        .load::<(String, i32)>(conn)
        .map_err(StorageError::from)?;
    Ok(rows.into_iter().collect())
}

pub fn resolve_asset_id(ids: &HashMap<String, i32>, asset_name: &str) -> Result<i32> {
    ids.get(asset_name).copied().ok_or_else(|| {
        Error::Database(DatabaseError::NotFound(format!(
            "Asset '{}' does not exist",
            asset_name
        )))
    })
}
