use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;
use valuator_core::seed::{parse_prices_csv, parse_weights_csv};
use valuator_server::{api::app_router, build_state, config::Config};

const WEIGHTS_CSV: &str = "fecha,activos,portafolio 1,portafolio 2\n\
                           2022-02-15,EEUU,0.6,0.25\n\
                           2022-02-15,Europa,0.4,0.25\n\
                           2022-02-15,Japon,0,0.5\n";

const PRICES_CSV: &str = "Dates,EEUU,Europa,Japon\n\
                          2022-02-15,1000,250,80\n\
                          2022-02-16,1100,250,\n\
                          2022-02-17,1050,200,100\n";

fn test_config(tmp: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        portfolio_ids: vec![1, 2],
        max_range_days: Some(3660),
        seed_dir: tmp.path().to_path_buf(),
    }
}

async fn build_test_router(seeded: bool) -> (axum::Router, TempDir) {
    let tmp = tempdir().unwrap();
    let config = test_config(&tmp);
    let state = build_state(&config).await.unwrap();
    if seeded {
        state
            .seed_service
            .seed(
                parse_weights_csv(WEIGHTS_CSV).unwrap(),
                parse_prices_csv(PRICES_CSV).unwrap(),
            )
            .await
            .unwrap();
    }
    (app_router(state, &config), tmp)
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()));
    (status, body)
}

#[tokio::test]
async fn healthz_reports_ok() {
    let (app, _tmp) = build_test_router(false).await;
    let (status, body) = get(&app, "/api/v1/healthz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".to_string()));
}

#[tokio::test]
async fn missing_dates_are_rejected() {
    let (app, _tmp) = build_test_router(true).await;
    for uri in [
        "/api/portfolio/",
        "/api/portfolio/?fecha_inicio=2022-02-15",
        "/api/portfolio/?fecha_fin=2022-02-15",
        "/api/portfolio/?fecha_inicio=&fecha_fin=2022-02-15",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(body["code"], 400);
        assert_eq!(body["message"], "Both start and end dates are required.");
    }
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let (app, _tmp) = build_test_router(true).await;
    let (status, body) = get(
        &app,
        "/api/portfolio/?fecha_inicio=15/02/2022&fecha_fin=2022-02-16",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid date format, expected 'YYYY-MM-DD'.");
}

#[tokio::test]
async fn reversed_range_is_rejected() {
    let (app, _tmp) = build_test_router(true).await;
    let (status, body) = get(
        &app,
        "/api/portfolio/?fecha_inicio=2022-02-17&fecha_fin=2022-02-15",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("2022-02-17"));
}

#[tokio::test]
async fn values_default_portfolios_per_day() {
    let (app, _tmp) = build_test_router(true).await;
    let (status, body) = get(
        &app,
        "/api/portfolio/?fecha_inicio=2022-02-15&fecha_fin=2022-02-17",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let portfolios = body["portfolios"].as_array().unwrap();
    assert_eq!(portfolios.len(), 2);
    assert_eq!(portfolios[0]["portfolio_id"], 1);
    assert_eq!(portfolios[1]["portfolio_id"], 2);

    let values = portfolios[0]["values"].as_array().unwrap();
    assert_eq!(values.len(), 3);
    assert_eq!(values[0]["t"], "2022-02-15");
    assert_eq!(values[2]["t"], "2022-02-17");
    assert_eq!(values[0]["portfolio_value"].as_f64(), Some(1_000_000_000.0));
    assert_eq!(values[0]["weights"]["EEUU"].as_f64(), Some(0.6));
    assert_eq!(values[0]["weights"]["Japon"].as_f64(), Some(0.0));

    // No Japon price on the 16th: portfolio 2 counts it at zero.
    let p2_day2 = &portfolios[1]["values"][1];
    assert_eq!(p2_day2["portfolio_value"].as_f64(), Some(525_000_000.0));
}

#[tokio::test]
async fn path_without_trailing_slash_and_explicit_portfolios() {
    let (app, _tmp) = build_test_router(true).await;
    let (status, body) = get(
        &app,
        "/api/portfolio?fecha_inicio=2022-02-15&fecha_fin=2022-02-15&portfolio_ids=2",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let portfolios = body["portfolios"].as_array().unwrap();
    assert_eq!(portfolios.len(), 1);
    assert_eq!(portfolios[0]["portfolio_id"], 2);
    assert_eq!(portfolios[0]["values"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_portfolio_is_unprocessable() {
    let (app, _tmp) = build_test_router(true).await;
    let (status, body) = get(
        &app,
        "/api/portfolio/?fecha_inicio=2022-02-15&fecha_fin=2022-02-16&portfolio_ids=1,9",
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 422);
}

#[tokio::test]
async fn assets_are_listed_in_insertion_order() {
    let (app, _tmp) = build_test_router(true).await;
    let (status, body) = get(&app, "/api/assets/").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["assetName"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["EEUU", "Europa", "Japon"]);
}

#[tokio::test]
async fn portfolio_id_beyond_storage_range_is_rejected() {
    let (app, _tmp) = build_test_router(true).await;
    let (status, body) = get(
        &app,
        "/api/portfolio/?fecha_inicio=2022-02-15&fecha_fin=2022-02-15&portfolio_ids=4294967295",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
}
