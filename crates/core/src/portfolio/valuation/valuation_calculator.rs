use crate::assets::Asset;
use crate::constants::{VALUE_DECIMAL_PRECISION, WEIGHT_DECIMAL_PRECISION};
use crate::errors::{CalculatorError, Result};
use crate::holdings::HoldingRepositoryTrait;
use crate::portfolio::valuation::{PortfolioSnapshot, ZeroValuePolicy};

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// The ordered asset universe of one request.
///
/// Quantity and price vectors can only be built against an `AssetIndex`,
/// and remember which index they were built from. `calculate_snapshot`
/// refuses to combine vectors from different indexes, so element `i` of
/// both vectors always refers to the same asset.
#[derive(Debug, Clone)]
pub struct AssetIndex {
    names: Arc<[String]>,
}

impl AssetIndex {
    pub fn new(assets: &[Asset]) -> Self {
        Self {
            names: assets.iter().map(|a| a.name.clone()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    fn is_same(&self, other: &Arc<[String]>) -> bool {
        Arc::ptr_eq(&self.names, other)
    }
}

/// Held quantity per asset, aligned with an `AssetIndex`.
#[derive(Debug, Clone)]
pub struct QuantityVector {
    index: Arc<[String]>,
    values: Vec<Decimal>,
}

impl QuantityVector {
    /// Resolves the initial quantity of every indexed asset for `portfolio_id`.
    ///
    /// Fails with `CalculatorError::MissingHolding` on the first asset that
    /// has no holding in the portfolio.
    pub fn resolve(
        index: &AssetIndex,
        portfolio_id: u32,
        holdings: &dyn HoldingRepositoryTrait,
    ) -> Result<Self> {
        let mut values = Vec::with_capacity(index.len());
        for name in index.names() {
            let holding = holdings
                .get_initial_holding(name, portfolio_id)?
                .ok_or_else(|| CalculatorError::MissingHolding {
                    asset: name.clone(),
                    portfolio_id,
                })?;
            values.push(holding.initial_quantity);
        }
        Ok(Self {
            index: index.names.clone(),
            values,
        })
    }

    pub fn from_values(index: &AssetIndex, values: Vec<Decimal>) -> Result<Self> {
        check_len(index, values.len(), "quantity")?;
        Ok(Self {
            index: index.names.clone(),
            values,
        })
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }
}

/// Price per asset on one day, aligned with an `AssetIndex`.
#[derive(Debug, Clone)]
pub struct PriceVector {
    index: Arc<[String]>,
    values: Vec<Decimal>,
}

impl PriceVector {
    /// Looks up every indexed asset in `prices_today`.
    ///
    /// Assets without a price on `date` are priced at zero.
    pub fn from_price_map(
        index: &AssetIndex,
        prices_today: &HashMap<String, Decimal>,
        date: NaiveDate,
    ) -> Self {
        let values = index
            .names()
            .iter()
            .map(|name| match prices_today.get(name) {
                Some(price) => *price,
                None => {
                    debug!(
                        "Missing price for asset {} on date {}. Market value treated as ZERO.",
                        name, date
                    );
                    Decimal::ZERO
                }
            })
            .collect();
        Self {
            index: index.names.clone(),
            values,
        }
    }

    pub fn from_values(index: &AssetIndex, values: Vec<Decimal>) -> Result<Self> {
        check_len(index, values.len(), "price")?;
        Ok(Self {
            index: index.names.clone(),
            values,
        })
    }

    pub fn values(&self) -> &[Decimal] {
        &self.values
    }
}

fn check_len(index: &AssetIndex, len: usize, kind: &str) -> Result<()> {
    if len != index.len() {
        return Err(CalculatorError::Calculation(format!(
            "{} vector has {} entries but the asset index has {}",
            kind,
            len,
            index.len()
        ))
        .into());
    }
    Ok(())
}

fn round_value(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(VALUE_DECIMAL_PRECISION, RoundingStrategy::MidpointNearestEven)
}

fn round_weight(weight: Decimal) -> Decimal {
    weight.round_dp_with_strategy(WEIGHT_DECIMAL_PRECISION, RoundingStrategy::MidpointNearestEven)
}

/// Computes the market value and asset weights of a portfolio on `date`.
///
/// Per-asset values are `round(quantity * price, 2)`, the portfolio value is
/// the rounded sum of those, and each weight is `round(value / total, 4)`.
/// Rounding is half-to-even throughout.
pub fn calculate_snapshot(
    index: &AssetIndex,
    quantities: &QuantityVector,
    prices: &PriceVector,
    date: NaiveDate,
    portfolio_id: u32,
    zero_value_policy: ZeroValuePolicy,
) -> Result<PortfolioSnapshot> {
    if !index.is_same(&quantities.index) || !index.is_same(&prices.index) {
        return Err(CalculatorError::Calculation(format!(
            "Quantity and price vectors for portfolio {} on {} were not built from the same asset index",
            portfolio_id, date
        ))
        .into());
    }

    let overflow = || -> crate::errors::Error {
        CalculatorError::Calculation(format!(
            "Market value of portfolio {} on {} overflowed",
            portfolio_id, date
        ))
        .into()
    };

    let asset_values: Vec<Decimal> = quantities
        .values
        .iter()
        .zip(prices.values.iter())
        .map(|(quantity, price)| {
            quantity
                .checked_mul(*price)
                .map(round_value)
                .ok_or_else(overflow)
        })
        .collect::<Result<_>>()?;

    let portfolio_value = round_value(
        asset_values
            .iter()
            .try_fold(Decimal::ZERO, |total, value| total.checked_add(*value))
            .ok_or_else(overflow)?,
    );

    let weights: BTreeMap<String, Decimal> = if portfolio_value.is_zero() {
        match zero_value_policy {
            ZeroValuePolicy::Reject => {
                return Err(CalculatorError::ZeroPortfolioValue { portfolio_id, date }.into());
            }
            ZeroValuePolicy::ZeroWeights => {
                warn!(
                    "Portfolio {} has zero market value on {}. All weights set to ZERO.",
                    portfolio_id, date
                );
                index
                    .names()
                    .iter()
                    .map(|name| (name.clone(), Decimal::ZERO))
                    .collect()
            }
        }
    } else {
        index
            .names()
            .iter()
            .zip(asset_values.iter())
            .map(|(name, value)| {
                value
                    .checked_div(portfolio_value)
                    .map(|weight| (name.clone(), round_weight(weight)))
                    .ok_or_else(overflow)
            })
            .collect::<Result<_>>()?
    };

    Ok(PortfolioSnapshot {
        t: date,
        weights,
        portfolio_value,
    })
}
