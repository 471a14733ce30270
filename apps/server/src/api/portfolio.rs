use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::{
    config::parse_portfolio_ids,
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use valuator_core::{
    portfolio::valuation::{ValuationResponse, ValuationServiceTrait},
    utils::time_utils::parse_date,
};

#[derive(serde::Deserialize)]
struct PortfolioQuery {
    fecha_inicio: Option<String>,
    fecha_fin: Option<String>,
    /// Comma-separated override of the default portfolio set
    portfolio_ids: Option<String>,
}

/// Sets its flag when dropped. Held by the handler while the blocking
/// valuation runs, so a request dropped by the timeout layer (or a client
/// disconnect) stops the remaining per-day work.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

fn parse_query_date(value: &str, field: &str) -> ApiResult<NaiveDate> {
    parse_date(value, field).map_err(|e| {
        tracing::debug!("Rejected query date: {}", e);
        ApiError::BadRequest("Invalid date format, expected 'YYYY-MM-DD'.".into())
    })
}

async fn get_portfolio_values(
    State(state): State<Arc<AppState>>,
    Query(q): Query<PortfolioQuery>,
) -> ApiResult<Json<ValuationResponse>> {
    let (start, end) = match (
        q.fecha_inicio.as_deref().filter(|s| !s.is_empty()),
        q.fecha_fin.as_deref().filter(|s| !s.is_empty()),
    ) {
        (Some(start), Some(end)) => (
            parse_query_date(start, "fecha_inicio")?,
            parse_query_date(end, "fecha_fin")?,
        ),
        _ => {
            return Err(ApiError::BadRequest(
                "Both start and end dates are required.".into(),
            ))
        }
    };
    let portfolio_ids = match q.portfolio_ids.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            parse_portfolio_ids(raw).map_err(|e| ApiError::BadRequest(format!("{:#}", e)))?,
        ),
        None => None,
    };

    // The engine and the diesel reads are synchronous.
    let service = state.valuation_service.clone();
    let cancel = Arc::new(AtomicBool::new(false));
    let _guard = CancelOnDrop(cancel.clone());
    let response = tokio::task::spawn_blocking(move || {
        let ids = portfolio_ids.unwrap_or_else(|| service.default_portfolio_ids().to_vec());
        service.compute_with_cancel(&ids, start, end, &cancel)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Valuation task failed: {}", e)))??;

    Ok(Json(response))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio", get(get_portfolio_values))
        .route("/portfolio/", get(get_portfolio_values))
}
