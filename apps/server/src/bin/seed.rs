//! Loads `weights.csv` and `prices.csv` into the database, replacing any
//! existing reference data.
//!
//! Usage: `seed [DIR]`; `DIR` defaults to `VL_SEED_DIR`.

use std::path::PathBuf;
use valuator_server::{build_state, config::Config, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    let seed_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.seed_dir.clone());

    let state = build_state(&config).await?;
    let summary = state
        .seed_service
        .seed_from_dir(&seed_dir)
        .await
        .map_err(|e| {
            tracing::error!(
                "Seeding {} from {} failed: {}. Reference data is unchanged if the sheets were invalid, otherwise it was cleared; rerun `seed` once the input is fixed.",
                state.db_path,
                seed_dir.display(),
                e
            );
            e
        })?;
    tracing::info!(
        "Seeded {}: {} assets, {} initial holdings, {} prices",
        state.db_path,
        summary.assets,
        summary.holdings,
        summary.prices
    );
    Ok(())
}
