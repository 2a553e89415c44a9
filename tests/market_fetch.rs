// tests/market_fetch.rs
use httpmock::prelude::*;
use pegwatch::config::MarketConfig;
use pegwatch::providers::yahoo::YahooMarket;
use pegwatch::providers::{MarketError, MarketProvider, SourceError};
use serde_json::json;

fn market(server: &MockServer) -> YahooMarket {
    let cfg = MarketConfig { base_url: server.base_url(), timeout_ms: 2_000, ..MarketConfig::default() };
    YahooMarket::with_client(reqwest::Client::new(), &cfg)
}

fn chart(ts: &[i64], closes: serde_json::Value) -> serde_json::Value {
    json!({ "chart": { "result": [{
        "meta": { "currency": "HKD" },
        "timestamp": ts,
        "indicators": { "quote": [{ "close": closes }] }
    }], "error": null } })
}

#[tokio::test]
async fn reading_uses_last_closes() {
    let server = MockServer::start_async().await;
    let spot = server
        .mock_async(|when, then| {
            when.method(GET)
                .path_contains("USDHKD")
                .query_param("range", "1mo")
                .query_param("interval", "1d");
            then.status(200).json_body(chart(
                &[1_715_126_400, 1_715_212_800, 1_715_299_200],
                json!([7.8150, 7.8310, 7.8300]),
            ));
        })
        .await;
    let rate = server
        .mock_async(|when, then| {
            when.method(GET).path_contains("IRX").query_param("range", "5d");
            then.status(200).json_body(chart(&[1_715_212_800, 1_715_299_200], json!([5.21, 5.20])));
        })
        .await;

    let r = market(&server).fetch().await.unwrap();
    spot.assert_async().await;
    rate.assert_async().await;
    assert_eq!(r.spot_latest(), 7.8300);
    assert_eq!(r.spot_previous(), 7.8310);
    assert_eq!(r.us_rate_3m(), 5.20);
    assert_eq!(r.spot_series().len(), 3);
    assert_eq!(r.spot_series()[0].ts_ms, 1_715_126_400_000);
}

#[tokio::test]
async fn empty_spot_series_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("USDHKD");
            then.status(200).json_body(json!({ "chart": { "result": null, "error": { "code": "Not Found" } } }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("IRX");
            then.status(200).json_body(chart(&[1_715_299_200], json!([5.20])));
        })
        .await;

    let err = market(&server).fetch().await.unwrap_err();
    assert!(matches!(err, MarketError::EmptySeries { ref symbol } if symbol == "USDHKD=X"), "{err}");
}

#[tokio::test]
async fn all_null_rate_series_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("USDHKD");
            then.status(200).json_body(chart(&[1, 2], json!([7.80, 7.81])));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("IRX");
            then.status(200).json_body(chart(&[1, 2], json!([null, null])));
        })
        .await;

    let err = market(&server).fetch().await.unwrap_err();
    assert!(matches!(err, MarketError::EmptySeries { ref symbol } if symbol == "^IRX"), "{err}");
}

#[tokio::test]
async fn http_failure_is_unavailable_with_cause() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("USDHKD");
            then.status(429).body("Too Many Requests");
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path_contains("IRX");
            then.status(200).json_body(chart(&[1], json!([5.2])));
        })
        .await;

    let err = market(&server).fetch().await.unwrap_err();
    assert!(
        matches!(err, MarketError::Source { source: SourceError::Status(429), .. }),
        "{err}"
    );
}
