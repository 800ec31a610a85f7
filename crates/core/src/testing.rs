//! 测试辅助实现，仅在 `test-utils` feature 下编译。

use crate::common::Interval;
use crate::market::entity::{KlineRow, PricePayload, TickerPayload};
use crate::market::error::MarketError;
use crate::market::port::MarketDataProvider;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// 一次 K 线请求的记录：发起时刻与请求数量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KlineRequest {
    pub at: Instant,
    pub limit: usize,
}

/// 单次调用的脚本化响应
#[derive(Debug, Clone)]
pub enum Scripted<T> {
    Ok(T),
    Fail(MarketError),
    // 永不返回，用于验证超时
    Hang,
}

/// # Summary
/// 按脚本依次返回响应的行情提供者替身。
///
/// # Invariants
/// - 脚本耗尽后一律返回 `MarketError::Network`。
/// - 每个接口的调用次数独立计数，K 线请求额外记录时刻与数量。
#[derive(Default)]
pub struct MockMarketDataProvider {
    klines: Mutex<VecDeque<Scripted<Vec<KlineRow>>>>,
    tickers: Mutex<VecDeque<Scripted<TickerPayload>>>,
    prices: Mutex<VecDeque<Scripted<PricePayload>>>,
    kline_calls: AtomicUsize,
    kline_requests: Mutex<Vec<KlineRequest>>,
    ticker_calls: AtomicUsize,
    price_calls: AtomicUsize,
}

impl MockMarketDataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// 总是失败的提供者。
    pub fn failing() -> Self {
        Self::default()
    }

    pub async fn push_klines(&self, response: Scripted<Vec<KlineRow>>) {
        self.klines.lock().await.push_back(response);
    }

    pub async fn push_ticker(&self, response: Scripted<TickerPayload>) {
        self.tickers.lock().await.push_back(response);
    }

    pub async fn push_price(&self, response: Scripted<PricePayload>) {
        self.prices.lock().await.push_back(response);
    }

    pub fn kline_calls(&self) -> usize {
        self.kline_calls.load(Ordering::SeqCst)
    }

    /// 按发起顺序返回全部 K 线请求记录。
    pub async fn kline_requests(&self) -> Vec<KlineRequest> {
        self.kline_requests.lock().await.clone()
    }

    pub fn ticker_calls(&self) -> usize {
        self.ticker_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

async fn play<T>(script: &Mutex<VecDeque<Scripted<T>>>) -> Result<T, MarketError> {
    let next = script.lock().await.pop_front();
    match next {
        Some(Scripted::Ok(value)) => Ok(value),
        Some(Scripted::Fail(err)) => Err(err),
        Some(Scripted::Hang) => std::future::pending().await,
        None => Err(MarketError::Network("no scripted response".to_string())),
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketDataProvider {
    async fn fetch_klines(
        &self,
        _symbol: &str,
        _interval: Interval,
        limit: usize,
    ) -> Result<Vec<KlineRow>, MarketError> {
        self.kline_calls.fetch_add(1, Ordering::SeqCst);
        self.kline_requests.lock().await.push(KlineRequest {
            at: Instant::now(),
            limit,
        });
        play(&self.klines).await
    }

    async fn fetch_ticker(&self, _symbol: &str) -> Result<TickerPayload, MarketError> {
        self.ticker_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.tickers).await
    }

    async fn fetch_price(&self, _symbol: &str) -> Result<PricePayload, MarketError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        play(&self.prices).await
    }
}
