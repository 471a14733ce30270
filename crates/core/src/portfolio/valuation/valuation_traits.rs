//! Service trait for portfolio valuations.

use chrono::NaiveDate;
use std::sync::atomic::AtomicBool;

use super::ValuationResponse;
use crate::errors::Result;

pub trait ValuationServiceTrait: Send + Sync {
    /// Values each portfolio in `portfolio_ids` for every day in
    /// `[start_date, end_date]`, both inclusive.
    ///
    /// The response holds one `PortfolioValues` per requested id, in request
    /// order, each with `(end_date - start_date).days + 1` snapshots in
    /// ascending date order. Any error aborts the whole request.
    fn compute(
        &self,
        portfolio_ids: &[u32],
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<ValuationResponse> {
        self.compute_with_cancel(portfolio_ids, start_date, end_date, &AtomicBool::new(false))
    }

    /// Same as `compute`, but stops early with `CalculatorError::Cancelled`
    /// once `cancel` is set. Checked before each day is valued.
    fn compute_with_cancel(
        &self,
        portfolio_ids: &[u32],
        start_date: NaiveDate,
        end_date: NaiveDate,
        cancel: &AtomicBool,
    ) -> Result<ValuationResponse>;

    /// Same as `compute`, using the service's default portfolio ids.
    fn compute_default(&self, start_date: NaiveDate, end_date: NaiveDate)
        -> Result<ValuationResponse>;

    fn default_portfolio_ids(&self) -> &[u32];
}
