use crate::common::Interval;
use crate::market::entity::{Candle, KlineRow, PricePayload, Stats, TickerPayload};
use crate::market::error::MarketError;
use async_trait::async_trait;

/// # Summary
/// 市场行情数据提供者接口（原始数据源）。
///
/// # Invariants
/// - 每次调用对应一次 HTTP 请求，不做重试与回退。
/// - 非成功状态码、空响应与格式错误都必须以 `MarketError` 返回。
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// # Summary
    /// 获取原始 K 线行。
    ///
    /// # Logic
    /// 1. 请求 `{base}/klines?symbol=&interval=&limit=`。
    /// 2. 校验状态码并解析为数组的数组。
    /// 3. 空数组视为失败。
    ///
    /// # Arguments
    /// * `symbol`: 交易对代码。
    /// * `interval`: K 线周期。
    /// * `limit`: 请求数量。
    ///
    /// # Returns
    /// 成功返回未经校验的原始行。
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<KlineRow>, MarketError>;

    /// # Summary
    /// 获取 24 小时统计原始响应。
    ///
    /// # Arguments
    /// * `symbol`: 交易对代码。
    ///
    /// # Returns
    /// 成功返回原始响应体。
    async fn fetch_ticker(&self, symbol: &str) -> Result<TickerPayload, MarketError>;

    /// 获取最新成交价原始响应。
    async fn fetch_price(&self, symbol: &str) -> Result<PricePayload, MarketError>;
}

/// # Summary
/// 面向图表的行情服务契约。
///
/// # Invariants
/// - `fetch_series` 永不失败，失败时以模拟数据代替。
/// - `fetch_stats` 与 `fetch_price` 以 `None` 表示不可用。
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// 获取 K 线序列，网络不可用时返回模拟序列。
    async fn fetch_series(&self, symbol: &str, interval: Interval, limit: usize) -> Vec<Candle>;

    /// 获取 24 小时统计，不重试。
    async fn fetch_stats(&self, symbol: &str) -> Option<Stats>;

    /// 获取最新成交价，不重试。
    async fn fetch_price(&self, symbol: &str) -> Option<f64>;
}
