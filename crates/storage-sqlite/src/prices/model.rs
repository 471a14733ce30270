//! Database model for asset prices (`asset_prices`).

use diesel::prelude::*;

use crate::utils::{date_to_db, decimal_to_db};
use valuator_core::prices::PricePoint;

/// Dates are `YYYY-MM-DD` text, so lexical order is date order.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_prices)]
pub struct NewPriceDB {
    pub asset_id: i32,
    pub date: String,
    pub price: String,
}

impl NewPriceDB {
    pub fn from_domain(point: &PricePoint, asset_id: i32) -> Self {
        Self {
            asset_id,
            date: date_to_db(point.date),
            price: decimal_to_db(&point.price),
        }
    }
}
