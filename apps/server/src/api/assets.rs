use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{extract::State, routing::get, Json, Router};
use valuator_core::assets::{Asset, AssetRepositoryTrait};

/// Lists the asset universe in valuation order.
async fn list_assets(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Asset>>> {
    let repository = state.asset_repository.clone();
    let assets = tokio::task::spawn_blocking(move || repository.list())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;
    Ok(Json(assets))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/assets/", get(list_assets))
}
