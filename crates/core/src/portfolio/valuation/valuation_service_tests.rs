//! Unit tests for the valuation service.

use super::*;
use crate::assets::{Asset, AssetRepositoryTrait, NewAsset};
use crate::errors::{CalculatorError, Error, Result};
use crate::holdings::{HoldingRepositoryTrait, InitialHolding, NewInitialHolding};
use crate::prices::{PricePoint, PriceRepositoryTrait};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Mock Implementations
// ============================================================================

struct MockAssetRepository {
    assets: Vec<Asset>,
    list_calls: AtomicUsize,
}

impl MockAssetRepository {
    fn new(names: &[&str]) -> Self {
        let assets = names
            .iter()
            .enumerate()
            .map(|(i, name)| Asset {
                id: i as i32 + 1,
                name: name.to_string(),
            })
            .collect();
        Self {
            assets,
            list_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AssetRepositoryTrait for MockAssetRepository {
    fn list(&self) -> Result<Vec<Asset>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.assets.clone())
    }

    fn get_by_name(&self, name: &str) -> Result<Asset> {
        self.assets
            .iter()
            .find(|a| a.name == name)
            .cloned()
            .ok_or_else(|| Error::Repository(format!("Asset {} not found", name)))
    }

    async fn create_many(&self, _new_assets: Vec<NewAsset>) -> Result<Vec<Asset>> {
        unimplemented!()
    }

    async fn delete_all(&self) -> Result<usize> {
        unimplemented!()
    }
}

struct MockHoldingRepository {
    holdings: HashMap<(String, u32), InitialHolding>,
}

impl MockHoldingRepository {
    fn new(rows: &[(&str, u32, Decimal)]) -> Self {
        let holdings = rows
            .iter()
            .map(|(name, portfolio_id, quantity)| {
                (
                    (name.to_string(), *portfolio_id),
                    InitialHolding {
                        asset_name: name.to_string(),
                        portfolio_id: *portfolio_id,
                        initial_quantity: *quantity,
                        initial_weight: Decimal::ZERO,
                    },
                )
            })
            .collect();
        Self { holdings }
    }
}

#[async_trait]
impl HoldingRepositoryTrait for MockHoldingRepository {
    fn get_initial_holding(
        &self,
        asset_name: &str,
        portfolio_id: u32,
    ) -> Result<Option<InitialHolding>> {
        Ok(self
            .holdings
            .get(&(asset_name.to_string(), portfolio_id))
            .cloned())
    }

    fn list_for_portfolio(&self, portfolio_id: u32) -> Result<Vec<InitialHolding>> {
        Ok(self
            .holdings
            .values()
            .filter(|h| h.portfolio_id == portfolio_id)
            .cloned()
            .collect())
    }

    fn list_portfolio_ids(&self) -> Result<Vec<u32>> {
        let mut ids: Vec<u32> = self.holdings.keys().map(|(_, id)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    async fn create_many(&self, _holdings: Vec<NewInitialHolding>) -> Result<usize> {
        unimplemented!()
    }

    async fn delete_all(&self) -> Result<usize> {
        unimplemented!()
    }
}

struct MockPriceRepository {
    prices: HashMap<NaiveDate, HashMap<String, Decimal>>,
    lookups: AtomicUsize,
}

impl MockPriceRepository {
    fn new(rows: &[(&str, NaiveDate, Decimal)]) -> Self {
        let mut prices: HashMap<NaiveDate, HashMap<String, Decimal>> = HashMap::new();
        for (name, date, price) in rows {
            prices
                .entry(*date)
                .or_default()
                .insert(name.to_string(), *price);
        }
        Self {
            prices,
            lookups: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PriceRepositoryTrait for MockPriceRepository {
    fn get_price(&self, asset_name: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        Ok(self
            .prices
            .get(&date)
            .and_then(|day| day.get(asset_name))
            .copied())
    }

    fn get_prices_on_date(&self, date: NaiveDate) -> Result<HashMap<String, Decimal>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.prices.get(&date).cloned().unwrap_or_default())
    }

    async fn create_many(&self, _prices: Vec<PricePoint>) -> Result<usize> {
        unimplemented!()
    }

    async fn delete_all(&self) -> Result<usize> {
        unimplemented!()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    assets: Arc<MockAssetRepository>,
    prices: Arc<MockPriceRepository>,
    service: ValuationService,
}

/// Universe {X, Y}; portfolio 1 holds X=10, Y=5 and portfolio 2 holds X=1, Y=30.
/// Y has no price on 2024-01-02.
fn fixture() -> Fixture {
    let assets = Arc::new(MockAssetRepository::new(&["X", "Y"]));
    let holdings = Arc::new(MockHoldingRepository::new(&[
        ("X", 1, dec!(10)),
        ("Y", 1, dec!(5)),
        ("X", 2, dec!(1)),
        ("Y", 2, dec!(30)),
    ]));
    let prices = Arc::new(MockPriceRepository::new(&[
        ("X", date(2024, 1, 1), dec!(100.00)),
        ("Y", date(2024, 1, 1), dec!(50.00)),
        ("X", date(2024, 1, 2), dec!(100.00)),
        ("X", date(2024, 1, 3), dec!(110.00)),
        ("Y", date(2024, 1, 3), dec!(45.00)),
    ]));
    let service = ValuationService::new(assets.clone(), holdings, prices.clone());
    Fixture {
        assets,
        prices,
        service,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_first_day_values_and_weights() {
    let f = fixture();
    let response = f
        .service
        .compute(&[1], date(2024, 1, 1), date(2024, 1, 1))
        .unwrap();

    assert_eq!(response.portfolios.len(), 1);
    let day = &response.portfolios[0].values[0];
    assert_eq!(day.t, date(2024, 1, 1));
    assert_eq!(day.portfolio_value, dec!(1250.00));
    assert_eq!(day.weights["X"], dec!(0.8000));
    assert_eq!(day.weights["Y"], dec!(0.2000));
}

#[test]
fn test_missing_price_degrades_to_zero() {
    let f = fixture();
    let response = f
        .service
        .compute(&[1], date(2024, 1, 2), date(2024, 1, 2))
        .unwrap();

    let day = &response.portfolios[0].values[0];
    assert_eq!(day.portfolio_value, dec!(1000.00));
    assert_eq!(day.weights["X"], dec!(1.0000));
    assert_eq!(day.weights["Y"], dec!(0.0000));
}

#[test]
fn test_range_is_covered_day_by_day_in_order() {
    let f = fixture();
    let response = f
        .service
        .compute(&[1], date(2024, 1, 1), date(2024, 1, 10))
        .unwrap();

    let values = &response.portfolios[0].values;
    assert_eq!(values.len(), 10);
    for (i, snapshot) in values.iter().enumerate() {
        assert_eq!(snapshot.t, date(2024, 1, 1) + chrono::Days::new(i as u64));
    }
    // Days past the last price are worth nothing.
    assert!(values[9].portfolio_value.is_zero());
    assert!(values[9].weights.values().all(|w| w.is_zero()));
    assert_eq!(f.prices.lookups.load(Ordering::SeqCst), 10);
}

#[test]
fn test_portfolios_keep_request_order() {
    let f = fixture();
    let response = f
        .service
        .compute(&[2, 1], date(2024, 1, 3), date(2024, 1, 3))
        .unwrap();

    let ids: Vec<u32> = response.portfolios.iter().map(|p| p.portfolio_id).collect();
    assert_eq!(ids, vec![2, 1]);

    // Portfolio 2: X = 1 * 110 = 110, Y = 30 * 45 = 1350, total 1460
    let p2 = &response.portfolios[0].values[0];
    assert_eq!(p2.portfolio_value, dec!(1460.00));
    assert_eq!(p2.weights["X"], dec!(0.0753));
    assert_eq!(p2.weights["Y"], dec!(0.9247));

    // Portfolio 1: X = 1100, Y = 225, total 1325
    let p1 = &response.portfolios[1].values[0];
    assert_eq!(p1.portfolio_value, dec!(1325.00));
    assert_eq!(p1.weights["X"], dec!(0.8302));
    assert_eq!(p1.weights["Y"], dec!(0.1698));
}

#[test]
fn test_compute_default_values_portfolios_one_and_two() {
    let f = fixture();
    let response = f
        .service
        .compute_default(date(2024, 1, 1), date(2024, 1, 3))
        .unwrap();

    assert_eq!(f.service.default_portfolio_ids(), &[1, 2]);
    let ids: Vec<u32> = response.portfolios.iter().map(|p| p.portfolio_id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert!(response.portfolios.iter().all(|p| p.values.len() == 3));
}

#[test]
fn test_universe_is_listed_once_per_request() {
    let f = fixture();
    f.service
        .compute(&[1, 2], date(2024, 1, 1), date(2024, 1, 31))
        .unwrap();
    assert_eq!(f.assets.list_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_reversed_range_fails_before_any_lookup() {
    let f = fixture();
    let err = f
        .service
        .compute(&[1, 2], date(2024, 1, 2), date(2024, 1, 1))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Calculation(CalculatorError::InvalidRange { .. })
    ));
    assert_eq!(f.assets.list_calls.load(Ordering::SeqCst), 0);
    assert_eq!(f.prices.lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cancelled_valuation_stops_before_pricing_days() {
    let f = fixture();
    let cancel = AtomicBool::new(true);
    let err = f
        .service
        .compute_with_cancel(&[1, 2], date(2024, 1, 1), date(2024, 1, 31), &cancel)
        .unwrap_err();

    assert!(matches!(err, Error::Calculation(CalculatorError::Cancelled)));
    assert_eq!(f.prices.lookups.load(Ordering::SeqCst), 0);
}

#[test]
fn test_uncancelled_flag_matches_plain_compute() {
    let f = fixture();
    let cancel = AtomicBool::new(false);
    let with_flag = f
        .service
        .compute_with_cancel(&[1, 2], date(2024, 1, 1), date(2024, 1, 3), &cancel)
        .unwrap();
    let plain = f
        .service
        .compute(&[1, 2], date(2024, 1, 1), date(2024, 1, 3))
        .unwrap();
    assert_eq!(with_flag, plain);
}

#[test]
fn test_missing_holding_aborts_whole_request() {
    let assets = Arc::new(MockAssetRepository::new(&["X", "Y"]));
    let holdings = Arc::new(MockHoldingRepository::new(&[
        ("X", 1, dec!(10)),
        ("Y", 1, dec!(5)),
        ("X", 2, dec!(1)),
    ]));
    let prices = Arc::new(MockPriceRepository::new(&[(
        "X",
        date(2024, 1, 1),
        dec!(100),
    )]));
    let service = ValuationService::new(assets, holdings, prices);

    let err = service
        .compute(&[1, 2], date(2024, 1, 1), date(2024, 1, 5))
        .unwrap_err();

    match err {
        Error::Calculation(CalculatorError::MissingHolding {
            asset,
            portfolio_id,
        }) => {
            assert_eq!(asset, "Y");
            assert_eq!(portfolio_id, 2);
        }
        other => panic!("expected MissingHolding, got {:?}", other),
    }
}

#[test]
fn test_max_range_days_is_enforced() {
    let f = fixture();
    let service = f.service.clone().with_max_range_days(Some(7));

    assert!(service
        .compute(&[1], date(2024, 1, 1), date(2024, 1, 7))
        .is_ok());

    let err = service
        .compute(&[1], date(2024, 1, 1), date(2024, 1, 8))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Calculation(CalculatorError::RangeTooLarge { days: 8, max: 7 })
    ));
}

#[test]
fn test_reject_policy_fails_on_unpriced_day() {
    let f = fixture();
    let service = f
        .service
        .clone()
        .with_zero_value_policy(ZeroValuePolicy::Reject);

    assert!(service
        .compute(&[1], date(2024, 1, 1), date(2024, 1, 3))
        .is_ok());
    let err = service
        .compute(&[1], date(2023, 12, 31), date(2024, 1, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Calculation(CalculatorError::ZeroPortfolioValue { portfolio_id: 1, .. })
    ));
}

#[test]
fn test_compute_is_idempotent() {
    let f = fixture();
    let first = f
        .service
        .compute(&[1, 2], date(2023, 12, 30), date(2024, 1, 5))
        .unwrap();
    let second = f
        .service
        .compute(&[1, 2], date(2023, 12, 30), date(2024, 1, 5))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_empty_portfolio_list_yields_empty_response() {
    let f = fixture();
    let response = f
        .service
        .compute(&[], date(2024, 1, 1), date(2024, 1, 3))
        .unwrap();
    assert!(response.portfolios.is_empty());
}
