use log::{debug, error, info};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::seed_model::{PricesTable, SeedSummary, WeightsTable};
use super::seed_parser::{parse_prices_csv, parse_weights_csv};
use crate::assets::{AssetRepositoryTrait, NewAsset};
use crate::constants::{INITIAL_PORTFOLIO_VALUE, QUANTITY_DECIMAL_PRECISION};
use crate::errors::{Error, Result, ValidationError};
use crate::holdings::{HoldingRepositoryTrait, NewInitialHolding};
use crate::prices::{PricePoint, PriceRepositoryTrait};

pub const WEIGHTS_FILE_NAME: &str = "weights.csv";
pub const PRICES_FILE_NAME: &str = "prices.csv";

/// Asset name -> row position in the weights sheet.
///
/// Built once per seed run and handed to every step that needs to resolve
/// an asset by name.
pub type AssetLookup = HashMap<String, usize>;

pub fn build_asset_lookup(weights: &WeightsTable) -> AssetLookup {
    weights
        .rows
        .iter()
        .enumerate()
        .map(|(position, row)| (row.asset_name.clone(), position))
        .collect()
}

/// Derives each asset's initial quantity per portfolio from its target
/// weight and its price on the first date of the prices sheet:
/// `weight * INITIAL_PORTFOLIO_VALUE / initial_price`, rounded to 8 decimals.
pub fn build_initial_holdings(
    weights: &WeightsTable,
    prices: &PricesTable,
) -> Result<Vec<NewInitialHolding>> {
    let initial_row = prices.initial_prices().ok_or_else(|| {
        Error::Validation(ValidationError::InvalidInput(
            "Prices sheet has no rows; initial prices are unknown".to_string(),
        ))
    })?;
    let initial_prices: HashMap<&str, Option<Decimal>> = prices
        .asset_names
        .iter()
        .map(String::as_str)
        .zip(initial_row.prices.iter().copied())
        .collect();

    let portfolio_value = Decimal::from(INITIAL_PORTFOLIO_VALUE);
    let mut holdings = Vec::with_capacity(weights.rows.len() * weights.portfolio_ids.len());

    for row in &weights.rows {
        let initial_price = initial_prices
            .get(row.asset_name.as_str())
            .copied()
            .flatten()
            .filter(|price| !price.is_zero());

        for (portfolio_id, weight) in weights.portfolio_ids.iter().zip(row.weights.iter()) {
            let initial_quantity = match initial_price {
                Some(price) => weight
                    .checked_mul(portfolio_value)
                    .and_then(|notional| notional.checked_div(price))
                    .ok_or_else(|| {
                        Error::Validation(ValidationError::InvalidInput(format!(
                            "Initial quantity of asset '{}' in portfolio {} overflowed (weight {}, price {})",
                            row.asset_name, portfolio_id, weight, price
                        )))
                    })?
                    .round_dp_with_strategy(
                        QUANTITY_DECIMAL_PRECISION,
                        RoundingStrategy::MidpointNearestEven,
                    ),
                None if weight.is_zero() => Decimal::ZERO,
                None => {
                    return Err(Error::Validation(ValidationError::InvalidInput(format!(
                        "Asset '{}' has weight {} in portfolio {} but no non-zero price on {}",
                        row.asset_name, weight, portfolio_id, initial_row.date
                    ))));
                }
            };

            let holding = NewInitialHolding {
                asset_name: row.asset_name.clone(),
                portfolio_id: *portfolio_id,
                initial_quantity,
                initial_weight: *weight,
            };
            holding.validate()?;
            holdings.push(holding);
        }
    }

    Ok(holdings)
}

/// Flattens the prices sheet into price points, skipping empty cells.
///
/// Every asset column must name an asset of the weights sheet.
pub fn build_price_points(prices: &PricesTable, lookup: &AssetLookup) -> Result<Vec<PricePoint>> {
    if let Some(unknown) = prices
        .asset_names
        .iter()
        .find(|name| !lookup.contains_key(name.as_str()))
    {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Prices sheet has a column for unknown asset '{}'",
            unknown
        ))));
    }

    let mut points = Vec::new();
    for row in &prices.rows {
        for (name, price) in prices.asset_names.iter().zip(row.prices.iter()) {
            if let Some(price) = price {
                let point = PricePoint::new(name.clone(), row.date, *price);
                point.validate()?;
                points.push(point);
            }
        }
    }
    Ok(points)
}

/// Loads reference data (assets, initial holdings, prices), replacing
/// whatever is currently stored.
pub struct SeedService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
}

impl SeedService {
    pub fn new(
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
    ) -> Self {
        Self {
            asset_repository,
            holding_repository,
            price_repository,
        }
    }

    /// Reads `weights.csv` and `prices.csv` from `dir` and seeds from them.
    pub async fn seed_from_dir(&self, dir: &Path) -> Result<SeedSummary> {
        let weights_path = dir.join(WEIGHTS_FILE_NAME);
        let prices_path = dir.join(PRICES_FILE_NAME);
        info!(
            "Reading seed data from {} and {}",
            weights_path.display(),
            prices_path.display()
        );
        let weights = parse_weights_csv(&std::fs::read_to_string(&weights_path)?)?;
        let prices = parse_prices_csv(&std::fs::read_to_string(&prices_path)?)?;
        self.seed(weights, prices).await
    }

    /// Validates the sheets, then resets the store and writes assets,
    /// initial holdings and prices.
    ///
    /// Nothing is deleted unless both sheets are valid. If a write fails
    /// after the reset, the store is cleared again, so it ends up either
    /// fully seeded or empty.
    pub async fn seed(&self, weights: WeightsTable, prices: PricesTable) -> Result<SeedSummary> {
        info!("Starting to seed db...");

        let lookup = build_asset_lookup(&weights);
        let holdings = build_initial_holdings(&weights, &prices)?;
        let price_points = build_price_points(&prices, &lookup)?;
        let new_assets: Vec<NewAsset> = weights
            .rows
            .iter()
            .map(|row| NewAsset::new(row.asset_name.clone()))
            .collect();
        for asset in &new_assets {
            asset.validate()?;
        }

        self.clear().await?;

        let summary = match self.load(new_assets, holdings, price_points).await {
            Ok(summary) => summary,
            Err(e) => {
                error!("Seeding failed after reset, clearing partial data: {}", e);
                if let Err(cleanup) = self.clear().await {
                    error!("Failed to clear partially seeded data: {}", cleanup);
                }
                return Err(e);
            }
        };
        info!(
            "Completed seeding db: {} assets, {} holdings, {} prices",
            summary.assets, summary.holdings, summary.prices
        );
        Ok(summary)
    }

    /// Deletes prices, holdings and assets, in foreign-key order.
    async fn clear(&self) -> Result<()> {
        let deleted_prices = self.price_repository.delete_all().await?;
        let deleted_holdings = self.holding_repository.delete_all().await?;
        let deleted_assets = self.asset_repository.delete_all().await?;
        debug!(
            "Cleared {} prices, {} holdings and {} assets",
            deleted_prices, deleted_holdings, deleted_assets
        );
        Ok(())
    }

    async fn load(
        &self,
        new_assets: Vec<NewAsset>,
        holdings: Vec<NewInitialHolding>,
        price_points: Vec<PricePoint>,
    ) -> Result<SeedSummary> {
        let assets = self.asset_repository.create_many(new_assets).await?;
        let holding_count = self.holding_repository.create_many(holdings).await?;
        let price_count = self.price_repository.create_many(price_points).await?;
        Ok(SeedSummary {
            assets: assets.len(),
            holdings: holding_count,
            prices: price_count,
        })
    }
}
