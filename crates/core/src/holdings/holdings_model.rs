//! Initial holding domain models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// Units of one asset held by one portfolio from the valuation start onwards.
///
/// `initial_weight` is kept for audit purposes only; valuation uses the
/// quantity alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialHolding {
    pub asset_name: String,
    pub portfolio_id: u32,
    pub initial_quantity: Decimal,
    pub initial_weight: Decimal,
}

/// Input model for creating an initial holding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInitialHolding {
    pub asset_name: String,
    pub portfolio_id: u32,
    pub initial_quantity: Decimal,
    pub initial_weight: Decimal,
}

impl NewInitialHolding {
    /// Validates the new holding data
    pub fn validate(&self) -> Result<()> {
        if self.asset_name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "asset_name".to_string(),
            )));
        }
        if self.initial_quantity < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Initial quantity for '{}' in portfolio {} cannot be negative: {}",
                self.asset_name, self.portfolio_id, self.initial_quantity
            ))));
        }
        if self.initial_weight < Decimal::ZERO || self.initial_weight > Decimal::ONE {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Initial weight for '{}' in portfolio {} must be within [0, 1]: {}",
                self.asset_name, self.portfolio_id, self.initial_weight
            ))));
        }
        Ok(())
    }
}

impl From<NewInitialHolding> for InitialHolding {
    fn from(new: NewInitialHolding) -> Self {
        Self {
            asset_name: new.asset_name,
            portfolio_id: new.portfolio_id,
            initial_quantity: new.initial_quantity,
            initial_weight: new.initial_weight,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn holding(quantity: Decimal, weight: Decimal) -> NewInitialHolding {
        NewInitialHolding {
            asset_name: "EEUU".to_string(),
            portfolio_id: 1,
            initial_quantity: quantity,
            initial_weight: weight,
        }
    }

    #[test]
    fn test_validate_accepts_zero_quantity_and_weight() {
        assert!(holding(dec!(0), dec!(0)).validate().is_ok());
        assert!(holding(dec!(1234.56789012), dec!(1)).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_negative_quantity() {
        assert!(holding(dec!(-0.00000001), dec!(0.5)).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_weight_out_of_range() {
        assert!(holding(dec!(10), dec!(1.0001)).validate().is_err());
        assert!(holding(dec!(10), dec!(-0.1)).validate().is_err());
    }

    #[test]
    fn test_quantity_keeps_eight_fractional_digits() {
        let h: InitialHolding = holding(dec!(0.12345678), dec!(0.1)).into();
        assert_eq!(h.initial_quantity.to_string(), "0.12345678");
    }
}
