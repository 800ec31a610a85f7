use chartfeed_core::common::{Interval, MAX_LIMIT};
use chartfeed_core::common::time::FakeClockProvider;
use chartfeed_core::market::entity::{KlineRow, PricePayload, TickerPayload};
use chartfeed_core::market::error::MarketError;
use chartfeed_core::market::port::MarketFeed;
use chartfeed_core::testing::{MockMarketDataProvider, Scripted};
use chartfeed_market::resilient::{ResilientFeed, RetryPolicy, SeriesOutcome};
use chartfeed_market::synthetic::SyntheticGenerator;
use chrono::{TimeZone, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const NOW: i64 = 1_700_000_000;

fn feed_with(provider: Arc<MockMarketDataProvider>) -> ResilientFeed {
    let clock = Arc::new(FakeClockProvider::new(
        Utc.timestamp_opt(NOW, 0).single().expect("valid timestamp"),
    ));
    ResilientFeed::with_generator(
        provider,
        RetryPolicy::default(),
        SyntheticGenerator::seeded(11).with_clock(clock),
    )
}

/// 构造 `count` 行合法的原始 K 线，时间间隔 1 小时。
fn valid_rows(count: i32) -> Vec<KlineRow> {
    (0..count)
        .map(|i| {
            let base = 100.0 + f64::from(i);
            json!([
                (NOW - i64::from(count - i) * 3_600) * 1_000,
                format!("{:.2}", base),
                format!("{:.2}", base + 2.0),
                format!("{:.2}", base - 1.0),
                format!("{:.2}", base + 1.0),
                "1500.5",
                0,
                "0"
            ])
            .as_array()
            .cloned()
            .unwrap_or_default()
        })
        .collect()
}

fn ticker(last_price: &str) -> TickerPayload {
    serde_json::from_value(json!({
        "symbol": "BTCUSDT",
        "priceChange": "-120.00",
        "priceChangePercent": "-0.28",
        "lastPrice": last_price,
        "highPrice": "43500.00",
        "lowPrice": "42500.00",
        "openPrice": "43120.00",
        "volume": "25000.5"
    }))
    .expect("valid ticker payload")
}

/// # Summary
/// 数据源始终失败时，应尝试 3 次、按 2s/4s 退避，并返回模拟序列。
#[tokio::test(start_paused = true)]
async fn test_exhausted_retries_fall_back_to_synthetic() {
    let provider = Arc::new(MockMarketDataProvider::failing());
    let feed = feed_with(provider.clone());

    let started = Instant::now();
    let outcome = feed.fetch_series_outcome("BTCUSDT", Interval::Hour1, 50).await;
    assert!(started.elapsed() >= Duration::from_secs(6));
    assert!(started.elapsed() < Duration::from_secs(7));

    let requests = provider.kline_requests().await;
    let gaps: Vec<Duration> = requests.windows(2).map(|w| w[1].at - w[0].at).collect();
    assert_eq!(gaps.len(), 2);
    assert!(gaps[0] >= Duration::from_secs(2) && gaps[0] < Duration::from_secs(3));
    assert!(gaps[1] >= Duration::from_secs(4) && gaps[1] < Duration::from_secs(5));
    match outcome {
        SeriesOutcome::ExhaustedRetries { attempts, last_error } => {
            assert_eq!(attempts, 3);
            assert!(matches!(last_error, MarketError::Network(_)));
        }
        SeriesOutcome::Fetched(_) => panic!("expected exhausted retries"),
    }
    assert_eq!(provider.kline_calls(), 3);

    let candles = feed.fetch_series("BTCUSDT", Interval::Hour1, 50).await;
    assert_eq!(candles.len(), 50);
    assert_eq!(provider.kline_calls(), 6);
    assert_eq!(candles.last().map(|c| c.time), Some(NOW));
    assert!(candles.iter().all(|c| c.is_valid()));
    assert!(candles.windows(2).all(|w| w[1].time - w[0].time == 3_600));
}

#[tokio::test(start_paused = true)]
async fn test_recovers_after_transient_failures() {
    let provider = Arc::new(MockMarketDataProvider::new());
    provider
        .push_klines(Scripted::Fail(MarketError::Status(502)))
        .await;
    provider
        .push_klines(Scripted::Fail(MarketError::Network("reset".to_string())))
        .await;
    provider.push_klines(Scripted::Ok(valid_rows(5))).await;
    let feed = feed_with(provider.clone());

    let candles = feed.fetch_series("ETHUSDT", Interval::Hour1, 5).await;

    assert_eq!(provider.kline_calls(), 3);
    assert_eq!(candles.len(), 5);
    assert_eq!(candles[0].open, 100.0);
    assert_eq!(candles[0].time, NOW - 5 * 3_600);
    assert_eq!(candles[4].close, 105.0);
}

/// # Summary
/// 挂起的请求在 10 秒超时后被丢弃，并计为一次失败。
#[tokio::test(start_paused = true)]
async fn test_hanging_request_counts_as_failed_attempt() {
    let provider = Arc::new(MockMarketDataProvider::new());
    provider.push_klines(Scripted::Hang).await;
    provider.push_klines(Scripted::Ok(valid_rows(3))).await;
    let feed = feed_with(provider.clone());

    let started = Instant::now();
    let outcome = feed.fetch_series_outcome("BTCUSDT", Interval::Hour1, 3).await;

    assert!(started.elapsed() >= Duration::from_secs(12));
    assert_eq!(provider.kline_calls(), 2);
    assert!(matches!(outcome, SeriesOutcome::Fetched(ref c) if c.len() == 3));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_rows_are_dropped_not_fatal() {
    let mut rows = valid_rows(4);
    // high 低于 close
    rows[1][2] = json!("50.00");
    // 非数值
    rows[2][4] = json!("n/a");
    let provider = Arc::new(MockMarketDataProvider::new());
    provider.push_klines(Scripted::Ok(rows)).await;
    let feed = feed_with(provider.clone());

    let candles = feed.fetch_series("BTCUSDT", Interval::Hour1, 4).await;

    assert_eq!(provider.kline_calls(), 1);
    assert_eq!(candles.len(), 2);
    assert!(candles.iter().all(|c| c.is_valid() && c.time >= 0));
}

#[tokio::test(start_paused = true)]
async fn test_batch_with_no_valid_rows_is_retried() {
    let garbage: Vec<KlineRow> = vec![vec![json!("x"), json!("y")]];
    let provider = Arc::new(MockMarketDataProvider::new());
    provider.push_klines(Scripted::Ok(garbage)).await;
    provider.push_klines(Scripted::Ok(valid_rows(2))).await;
    let feed = feed_with(provider.clone());

    let outcome = feed.fetch_series_outcome("BTCUSDT", Interval::Hour1, 2).await;

    assert_eq!(provider.kline_calls(), 2);
    assert!(matches!(outcome, SeriesOutcome::Fetched(ref c) if c.len() == 2));
}

#[tokio::test(start_paused = true)]
async fn test_zero_limit_and_blank_symbol_use_defaults() {
    let provider = Arc::new(MockMarketDataProvider::failing());
    let feed = feed_with(provider);

    let candles = feed.fetch_series("  ", Interval::Minute5, 0).await;
    assert_eq!(candles.len(), 200);
    // 默认交易对 BTCUSDT 的基准价
    assert_eq!(candles[0].open, 43_000.0);
}

#[tokio::test(start_paused = true)]
async fn test_oversized_limit_is_capped() {
    let provider = Arc::new(MockMarketDataProvider::failing());
    let feed = feed_with(provider.clone());

    let candles = feed
        .fetch_series("BTCUSDT", Interval::Hour1, usize::MAX / 2)
        .await;

    assert_eq!(candles.len(), MAX_LIMIT);
    let requests = provider.kline_requests().await;
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.limit == MAX_LIMIT));
}

#[tokio::test(start_paused = true)]
async fn test_stats_single_attempt() {
    let provider = Arc::new(MockMarketDataProvider::new());
    provider.push_ticker(Scripted::Ok(ticker("43000.10"))).await;
    provider.push_ticker(Scripted::Ok(ticker("not-a-price"))).await;
    provider
        .push_ticker(Scripted::Fail(MarketError::Status(500)))
        .await;
    provider.push_ticker(Scripted::Hang).await;
    let feed = feed_with(provider.clone());

    let stats = feed.fetch_stats("BTCUSDT").await.expect("stats available");
    assert_eq!(stats.last_price, 43_000.10);
    assert_eq!(stats.price_change_percent, -0.28);

    assert!(feed.fetch_stats("BTCUSDT").await.is_none());
    assert!(feed.fetch_stats("BTCUSDT").await.is_none());

    let started = Instant::now();
    assert!(feed.fetch_stats("BTCUSDT").await.is_none());
    assert!(started.elapsed() >= Duration::from_secs(10));

    // 每次调用只请求一次，不重试
    assert_eq!(provider.ticker_calls(), 4);
}

#[tokio::test]
async fn test_latest_price() {
    let provider = Arc::new(MockMarketDataProvider::new());
    provider
        .push_price(Scripted::Ok(PricePayload {
            symbol: "SOLUSDT".to_string(),
            price: "98.42".to_string(),
        }))
        .await;
    let feed = feed_with(provider.clone());

    assert_eq!(feed.fetch_price("SOLUSDT").await, Some(98.42));
    assert_eq!(feed.fetch_price("SOLUSDT").await, None);
    assert_eq!(provider.price_calls(), 2);
}
