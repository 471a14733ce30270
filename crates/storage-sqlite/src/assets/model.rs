//! Database model for assets.

use diesel::prelude::*;

use valuator_core::assets::{Asset, NewAsset};

/// Database model for assets
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: i32,
    pub asset_name: String,
}

/// Insert model; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::assets)]
pub struct NewAssetDB {
    pub asset_name: String,
}

impl From<AssetDB> for Asset {
    fn from(db: AssetDB) -> Self {
        Self {
            id: db.id,
            name: db.asset_name,
        }
    }
}

impl From<NewAsset> for NewAssetDB {
    fn from(domain: NewAsset) -> Self {
        Self {
            asset_name: domain.name,
        }
    }
}
