//! Price point domain model.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Closing price of one asset on one calendar day.
///
/// Price points are historical facts: they are inserted once and never
/// updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub asset_name: String,
    pub date: NaiveDate,
    pub price: Decimal,
}

impl PricePoint {
    pub fn new(asset_name: impl Into<String>, date: NaiveDate, price: Decimal) -> Self {
        Self {
            asset_name: asset_name.into(),
            date,
            price,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.price < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Price for '{}' on {} cannot be negative: {}",
                self.asset_name, self.date, self.price
            ))));
        }
        Ok(())
    }
}
