use crate::assets::AssetRepositoryTrait;
use crate::constants::DEFAULT_PORTFOLIO_IDS;
use crate::errors::{CalculatorError, Result};
use crate::holdings::HoldingRepositoryTrait;
use crate::portfolio::valuation::valuation_calculator::{
    calculate_snapshot, AssetIndex, PriceVector, QuantityVector,
};
use crate::portfolio::valuation::{
    PortfolioSnapshot, PortfolioValues, ValuationResponse, ValuationServiceTrait, ZeroValuePolicy,
};
use crate::prices::PriceRepositoryTrait;
use crate::utils::time_utils::DateRange;

use chrono::NaiveDate;
use log::{debug, error, info};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Clone)]
pub struct ValuationService {
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    price_repository: Arc<dyn PriceRepositoryTrait>,
    default_portfolio_ids: Vec<u32>,
    max_range_days: Option<u32>,
    zero_value_policy: ZeroValuePolicy,
}

impl ValuationService {
    pub fn new(
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        price_repository: Arc<dyn PriceRepositoryTrait>,
    ) -> Self {
        Self {
            asset_repository,
            holding_repository,
            price_repository,
            default_portfolio_ids: DEFAULT_PORTFOLIO_IDS.to_vec(),
            max_range_days: None,
            zero_value_policy: ZeroValuePolicy::default(),
        }
    }

    pub fn with_default_portfolio_ids(mut self, portfolio_ids: Vec<u32>) -> Self {
        self.default_portfolio_ids = portfolio_ids;
        self
    }

    /// Caps the number of days a single request may cover.
    pub fn with_max_range_days(mut self, max_range_days: Option<u32>) -> Self {
        self.max_range_days = max_range_days;
        self
    }

    pub fn with_zero_value_policy(mut self, policy: ZeroValuePolicy) -> Self {
        self.zero_value_policy = policy;
        self
    }

    fn validate_range(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<DateRange> {
        let range = DateRange::new(start_date, end_date)?;
        if let Some(max) = self.max_range_days {
            if range.len() > i64::from(max) {
                return Err(CalculatorError::RangeTooLarge {
                    days: range.len(),
                    max,
                }
                .into());
            }
        }
        Ok(range)
    }

    /// Values one portfolio over every day of `range`.
    ///
    /// Holdings are resolved once; each day only needs that day's prices, so
    /// days are computed in parallel and collected back in date order.
    fn calculate_values_for_portfolio(
        &self,
        index: &AssetIndex,
        portfolio_id: u32,
        range: &DateRange,
        cancel: &AtomicBool,
    ) -> Result<PortfolioValues> {
        let quantities =
            QuantityVector::resolve(index, portfolio_id, self.holding_repository.as_ref())?;

        let values: Vec<PortfolioSnapshot> = range
            .days()
            .into_par_iter()
            .map(|date| {
                if cancel.load(Ordering::Relaxed) {
                    return Err(CalculatorError::Cancelled.into());
                }
                let prices_today = self.price_repository.get_prices_on_date(date)?;
                let prices = PriceVector::from_price_map(index, &prices_today, date);
                calculate_snapshot(
                    index,
                    &quantities,
                    &prices,
                    date,
                    portfolio_id,
                    self.zero_value_policy,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Valued portfolio {} over {} days ({} to {})",
            portfolio_id,
            values.len(),
            range.start(),
            range.end()
        );

        Ok(PortfolioValues {
            portfolio_id,
            values,
        })
    }
}

impl ValuationServiceTrait for ValuationService {
    fn compute_with_cancel(
        &self,
        portfolio_ids: &[u32],
        start_date: NaiveDate,
        end_date: NaiveDate,
        cancel: &AtomicBool,
    ) -> Result<ValuationResponse> {
        let start_time = Instant::now();
        info!(
            "Starting valuation of portfolios {:?} for range {} - {}",
            portfolio_ids, start_date, end_date
        );

        let range = self.validate_range(start_date, end_date)?;

        // One universe per request: every portfolio and every day is aligned
        // against this index.
        let assets = self.asset_repository.list()?;
        let index = AssetIndex::new(&assets);

        let portfolios = portfolio_ids
            .par_iter()
            .map(|portfolio_id| {
                self.calculate_values_for_portfolio(&index, *portfolio_id, &range, cancel)
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                error!(
                    "Valuation failed for range {} - {}: {}",
                    start_date, end_date, e
                );
                e
            })?;

        info!(
            "Valued {} portfolios x {} days x {} assets in {:?}",
            portfolios.len(),
            range.len(),
            index.len(),
            start_time.elapsed()
        );

        Ok(ValuationResponse { portfolios })
    }

    fn compute_default(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ValuationResponse> {
        self.compute(&self.default_portfolio_ids, start_date, end_date)
    }

    fn default_portfolio_ids(&self) -> &[u32] {
        &self.default_portfolio_ids
    }
}
