//! Database model for initial holdings (`asset_initials`).

use diesel::prelude::*;

use crate::utils::{
    decimal_from_db, decimal_to_db, portfolio_id_from_db, portfolio_id_to_db,
};
use valuator_core::holdings::{InitialHolding, NewInitialHolding};
use valuator_core::Result;

#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_initials)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct InitialHoldingDB {
    pub id: i32,
    pub asset_id: i32,
    pub portfolio_id: i32,
    pub initial_quantity: String,
    pub initial_weight: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_initials)]
pub struct NewInitialHoldingDB {
    pub asset_id: i32,
    pub portfolio_id: i32,
    pub initial_quantity: String,
    pub initial_weight: String,
}

impl NewInitialHoldingDB {
    pub fn from_domain(holding: &NewInitialHolding, asset_id: i32) -> Result<Self> {
        Ok(Self {
            asset_id,
            portfolio_id: portfolio_id_to_db(holding.portfolio_id)?,
            initial_quantity: decimal_to_db(&holding.initial_quantity),
            initial_weight: decimal_to_db(&holding.initial_weight),
        })
    }
}

impl InitialHoldingDB {
    /// Rows only carry the asset id; the caller supplies the joined name.
    pub fn into_domain(self, asset_name: String) -> Result<InitialHolding> {
        Ok(InitialHolding {
            asset_name,
            portfolio_id: portfolio_id_from_db(self.portfolio_id)?,
            initial_quantity: decimal_from_db(&self.initial_quantity)?,
            initial_weight: decimal_from_db(&self.initial_weight)?,
        })
    }
}
