use chartfeed_core::common::Interval;
use chartfeed_core::config::FeedConfig;
use chartfeed_core::market::error::MarketError;
use chartfeed_core::market::port::MarketDataProvider;
use chartfeed_feed::binance::BinanceProvider;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer, timeout_secs: u64) -> BinanceProvider {
    let config = FeedConfig {
        base_url: format!("{}/api/v3/", server.uri()),
        request_timeout_secs: timeout_secs,
        ..FeedConfig::default()
    };
    BinanceProvider::new(&config).expect("client builds")
}

/// # Summary
/// 验证 K 线请求的路径、查询参数与原始行解码。
#[tokio::test]
async fn test_fetch_klines_sends_query_and_decodes_rows() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "ETHUSDT"))
        .and(query_param("interval", "15m"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            [1_700_000_000_000_i64, "2300.1", "2310.0", "2295.5", "2305.2", "123.4", 1_700_000_899_999_i64],
            [1_700_000_900_000_i64, "2305.2", "2307.0", "2301.0", "2302.0", "99.0", 1_700_001_799_999_i64]
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server, 10);
    let rows = provider.fetch_klines("ETHUSDT", Interval::Minute15, 2).await?;

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], json!(1_700_000_000_000_i64));
    assert_eq!(rows[1][4], json!("2302.0"));
    Ok(())
}

#[tokio::test]
async fn test_fetch_klines_empty_array_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let result = provider_for(&server, 10)
        .fetch_klines("BTCUSDT", Interval::Hour1, 200)
        .await;
    assert!(matches!(result, Err(MarketError::Empty)));
}

#[tokio::test]
async fn test_fetch_klines_status_and_body_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "LIMITED"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/klines"))
        .and(query_param("symbol", "GARBAGE"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let provider = provider_for(&server, 10);
    let limited = provider.fetch_klines("LIMITED", Interval::Hour1, 10).await;
    assert!(matches!(limited, Err(MarketError::Status(429))));

    let garbage = provider.fetch_klines("GARBAGE", Interval::Hour1, 10).await;
    assert!(matches!(garbage, Err(MarketError::Parse(_))));
}

/// # Summary
/// 服务端响应慢于客户端超时时返回 Timeout。
#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = provider_for(&server, 1).fetch_ticker("BTCUSDT").await;
    assert!(matches!(result, Err(MarketError::Timeout(_))));
}

#[tokio::test]
async fn test_fetch_ticker_and_price() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbol": "BTCUSDT",
            "priceChange": "120.50",
            "priceChangePercent": "0.281",
            "weightedAvgPrice": "43010.00",
            "prevClosePrice": "42880.00",
            "lastPrice": "43000.50",
            "bidPrice": "43000.40",
            "askPrice": "43000.60",
            "openPrice": "42880.00",
            "highPrice": "43500.00",
            "lowPrice": "42500.00",
            "volume": "25000.5",
            "quoteVolume": "1075000000.0",
            "openTime": 1_699_913_600_000_i64,
            "closeTime": 1_700_000_000_000_i64,
            "count": 1_234_567
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "symbol": "BTCUSDT", "price": "43000.50" })),
        )
        .mount(&server)
        .await;

    let provider = provider_for(&server, 10);
    let ticker = provider.fetch_ticker("BTCUSDT").await?;
    assert_eq!(ticker.symbol, "BTCUSDT");
    assert_eq!(ticker.last_price, "43000.50");
    assert_eq!(ticker.count, Some(1_234_567));

    let price = provider.fetch_price("BTCUSDT").await?;
    assert_eq!(price.parse_price()?, 43_000.50);
    Ok(())
}
