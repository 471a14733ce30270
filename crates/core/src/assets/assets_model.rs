//! Asset domain models.

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};

/// A tradable asset, identified by its unique name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i32,
    #[serde(rename = "assetName")]
    pub name: String,
}

/// Input model for creating a new asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub name: String,
}

impl NewAsset {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Validates the new asset data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Asset name cannot be empty".to_string(),
            )));
        }
        if self.name.trim() != self.name {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Asset name '{}' has leading or trailing whitespace",
                self.name
            ))));
        }
        Ok(())
    }
}
