use crate::kline;
use crate::synthetic::SyntheticGenerator;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chartfeed_core::common::{DEFAULT_LIMIT, DEFAULT_SYMBOL, Interval, MAX_LIMIT};
use chartfeed_core::config::FeedConfig;
use chartfeed_core::market::entity::{Candle, Stats};
use chartfeed_core::market::error::MarketError;
use chartfeed_core::market::port::{MarketDataProvider, MarketFeed};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// # Summary
/// 重试策略：最多尝试次数、单次超时与指数退避基数。
///
/// # Invariants
/// - 第 n 次失败后等待 `backoff_base * 2^(n-1)`，默认为 2s、4s。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub request_timeout: Duration,
    pub backoff_base: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&FeedConfig::default())
    }
}

impl From<&FeedConfig> for RetryPolicy {
    fn from(config: &FeedConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            request_timeout: config.request_timeout(),
            backoff_base: config.backoff_base(),
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.backoff_base)
            .with_factor(2.0)
            .with_max_times(self.max_attempts.saturating_sub(1))
    }
}

/// # Summary
/// 一次序列抓取的内部结果。
///
/// # Invariants
/// - `Fetched` 中的序列非空、时间严格递增且逐根满足 OHLC 不变量。
/// - 对外接口会把 `ExhaustedRetries` 折叠为模拟序列。
#[derive(Debug)]
pub enum SeriesOutcome {
    Fetched(Vec<Candle>),
    ExhaustedRetries {
        attempts: usize,
        last_error: MarketError,
    },
}

/// # Summary
/// 具备超时、重试、逐行校验与模拟回退能力的行情服务。
///
/// # Invariants
/// - `fetch_series` 永不失败：重试耗尽后以同一 symbol/limit 生成模拟序列。
/// - `fetch_stats`、`fetch_price` 只尝试一次，失败返回 None。
/// - 除生成器的随机源外不持有可变共享状态。
pub struct ResilientFeed {
    // 原始行情数据源
    provider: Arc<dyn MarketDataProvider>,
    // 回退用的模拟生成器
    generator: Mutex<SyntheticGenerator>,
    policy: RetryPolicy,
}

impl ResilientFeed {
    /// # Summary
    /// 使用配置中的重试策略与熵源随机数创建服务。
    ///
    /// # Arguments
    /// * `provider`: 满足 MarketDataProvider 接口的数据源驱动。
    /// * `config`: 行情抓取配置。
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: &FeedConfig) -> Self {
        Self::with_generator(provider, RetryPolicy::from(config), SyntheticGenerator::from_entropy())
    }

    /// 显式注入重试策略与生成器。
    pub fn with_generator(
        provider: Arc<dyn MarketDataProvider>,
        policy: RetryPolicy,
        generator: SyntheticGenerator,
    ) -> Self {
        Self {
            provider,
            generator: Mutex::new(generator),
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// # Summary
    /// 抓取 K 线序列并保留成功 / 重试耗尽的区分。
    ///
    /// # Logic
    /// 1. 每次尝试受 `request_timeout` 约束，超时计为一次失败。
    /// 2. 失败后按指数退避等待，最多尝试 `max_attempts` 次。
    /// 3. 成功时逐行校验并丢弃不合法的行，全部被丢弃视为失败。
    ///
    /// # Arguments
    /// * `symbol`: 交易对代码。
    /// * `interval`: K 线周期。
    /// * `limit`: 请求数量。
    ///
    /// # Returns
    /// `SeriesOutcome::Fetched` 或携带最后一次错误的 `ExhaustedRetries`。
    pub async fn fetch_series_outcome(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> SeriesOutcome {
        let attempts = AtomicUsize::new(0);
        let counter = &attempts;

        let attempt = || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(symbol, %interval, limit, attempt = n, "Fetching klines");
            self.attempt_series(symbol, interval, limit).await
        };

        let result = attempt
            .retry(self.policy.backoff())
            .notify(|err: &MarketError, delay: Duration| {
                warn!(symbol, error = %err, ?delay, "Kline fetch failed, retrying");
            })
            .await;

        match result {
            Ok(candles) => SeriesOutcome::Fetched(candles),
            Err(last_error) => SeriesOutcome::ExhaustedRetries {
                attempts: attempts.load(Ordering::SeqCst),
                last_error,
            },
        }
    }

    async fn attempt_series(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketError> {
        let rows = self
            .bounded(self.provider.fetch_klines(symbol, interval, limit))
            .await?;
        let candles = kline::parse_rows(symbol, &rows);
        if candles.is_empty() {
            return Err(MarketError::Empty);
        }
        if candles.len() < rows.len() {
            warn!(
                symbol,
                kept = candles.len(),
                dropped = rows.len() - candles.len(),
                "Dropped invalid kline rows"
            );
        }
        Ok(candles)
    }

    /// 为单次请求加上超时边界，超时的请求会被丢弃。
    async fn bounded<T>(
        &self,
        fut: impl Future<Output = Result<T, MarketError>>,
    ) -> Result<T, MarketError> {
        tokio::time::timeout(self.policy.request_timeout, fut)
            .await
            .map_err(|_| MarketError::Timeout(self.policy.request_timeout))?
    }
}

fn normalize<'a>(symbol: &'a str, limit: usize) -> (&'a str, usize) {
    let symbol = symbol.trim();
    let symbol = if symbol.is_empty() { DEFAULT_SYMBOL } else { symbol };
    let limit = if limit == 0 { DEFAULT_LIMIT } else { limit.min(MAX_LIMIT) };
    (symbol, limit)
}

#[async_trait]
impl MarketFeed for ResilientFeed {
    /// # Summary
    /// 获取 K 线序列，网络不可用时静默回退到模拟序列。
    ///
    /// # Logic
    /// 1. 空 symbol 使用默认交易对，limit 为 0 时使用默认数量，超过上限时截断为 `MAX_LIMIT`。
    /// 2. 调用 `fetch_series_outcome`。
    /// 3. 重试耗尽时用同一 symbol/limit 调用模拟生成器。
    async fn fetch_series(&self, symbol: &str, interval: Interval, limit: usize) -> Vec<Candle> {
        let (symbol, limit) = normalize(symbol, limit);
        match self.fetch_series_outcome(symbol, interval, limit).await {
            SeriesOutcome::Fetched(candles) => {
                info!(symbol, %interval, candles = candles.len(), "Fetched klines");
                candles
            }
            SeriesOutcome::ExhaustedRetries {
                attempts,
                last_error,
            } => {
                warn!(
                    symbol,
                    attempts,
                    error = %last_error,
                    "Kline fetch exhausted retries, falling back to synthetic data"
                );
                self.generator.lock().await.generate(symbol, limit)
            }
        }
    }

    /// # Summary
    /// 获取 24 小时统计。
    ///
    /// # Logic
    /// 1. 单次请求，受超时约束，不重试。
    /// 2. 网络、状态码、解析任一失败均返回 None，不生成替代数据。
    async fn fetch_stats(&self, symbol: &str) -> Option<Stats> {
        let result = self
            .bounded(self.provider.fetch_ticker(symbol))
            .await
            .and_then(Stats::try_from);
        match result {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(symbol, error = %e, "24hr stats unavailable");
                None
            }
        }
    }

    async fn fetch_price(&self, symbol: &str) -> Option<f64> {
        let result = self
            .bounded(self.provider.fetch_price(symbol))
            .await
            .and_then(|payload| payload.parse_price());
        match result {
            Ok(price) => Some(price),
            Err(e) => {
                warn!(symbol, error = %e, "Latest price unavailable");
                None
            }
        }
    }
}
