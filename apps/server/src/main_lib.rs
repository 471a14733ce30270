use std::sync::Arc;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use valuator_core::{
    assets::AssetRepositoryTrait,
    portfolio::valuation::{ValuationService, ValuationServiceTrait},
    seed::SeedService,
};
use valuator_storage_sqlite::{
    db::{self, write_actor},
    AssetRepository, HoldingRepository, PriceRepository,
};

pub struct AppState {
    pub valuation_service: Arc<dyn ValuationServiceTrait + Send + Sync>,
    pub asset_repository: Arc<dyn AssetRepositoryTrait>,
    pub seed_service: Arc<SeedService>,
    pub db_path: String,
}

pub fn init_tracing() {
    let log_format = std::env::var("VL_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&db::get_db_path(&config.db_path))?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = write_actor::spawn_writer((*pool).clone());

    let asset_repository = Arc::new(AssetRepository::new(pool.clone(), writer.clone()));
    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let price_repository = Arc::new(PriceRepository::new(pool.clone(), writer.clone()));

    let valuation_service = Arc::new(
        ValuationService::new(
            asset_repository.clone(),
            holding_repository.clone(),
            price_repository.clone(),
        )
        .with_default_portfolio_ids(config.portfolio_ids.clone())
        .with_max_range_days(config.max_range_days),
    );
    let seed_service = Arc::new(SeedService::new(
        asset_repository.clone(),
        holding_repository,
        price_repository,
    ));

    Ok(Arc::new(AppState {
        valuation_service,
        asset_repository,
        seed_service,
        db_path,
    }))
}
