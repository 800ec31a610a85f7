use async_trait::async_trait;
use chartfeed_core::common::Interval;
use chartfeed_core::config::FeedConfig;
use chartfeed_core::market::entity::{KlineRow, PricePayload, TickerPayload};
use chartfeed_core::market::error::MarketError;
use chartfeed_core::market::port::MarketDataProvider;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// # Summary
/// Binance v3 REST 行情提供者实现。
///
/// # Invariants
/// - 使用 `reqwest` 异步客户端进行通讯，每个请求受统一超时约束。
/// - 只负责单次请求与响应解码，重试和回退由上层负责。
#[derive(Clone)]
pub struct BinanceProvider {
    /// 内部使用的 HTTP 客户端
    client: Client,
    /// 接口根地址，例如 `https://api.binance.com/api/v3`
    base_url: String,
    /// 单次请求超时
    timeout: Duration,
}

impl BinanceProvider {
    /// # Summary
    /// 根据配置创建 BinanceProvider。
    ///
    /// # Logic
    /// 1. 安装 ring 作为进程级 rustls 加密提供者（已安装则跳过）。
    /// 2. 按配置设置请求超时与 User-Agent。
    /// 3. 去掉根地址末尾的 `/`，便于拼接路径。
    ///
    /// # Arguments
    /// * `config`: 行情抓取配置。
    ///
    /// # Returns
    /// 成功返回提供者实例，客户端构建失败返回 `MarketError::Unknown`。
    pub fn new(config: &FeedConfig) -> Result<Self, MarketError> {
        if rustls::crypto::ring::default_provider()
            .install_default()
            .is_err()
        {
            debug!("rustls crypto provider already installed");
        }

        let timeout = config.request_timeout();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("chartfeed/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MarketError::Unknown(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    /// 接口根地址。
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// # Summary
    /// 发起 GET 请求并解码 JSON 响应。
    ///
    /// # Logic
    /// 1. 拼接路径与查询参数并发送请求。
    /// 2. 超时映射为 `MarketError::Timeout`，其余传输错误映射为 `Network`。
    /// 3. 非 2xx 状态码映射为 `MarketError::Status`。
    /// 4. 响应体反序列化失败映射为 `MarketError::Parse`。
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, ?query, "GET");

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let resp = check_status(resp)?;
        resp.json::<T>()
            .await
            .map_err(|e| MarketError::Parse(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> MarketError {
        if err.is_timeout() {
            MarketError::Timeout(self.timeout)
        } else {
            MarketError::Network(err.to_string())
        }
    }
}

fn check_status(resp: Response) -> Result<Response, MarketError> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(MarketError::Status(status.as_u16()))
    }
}

#[async_trait]
impl MarketDataProvider for BinanceProvider {
    /// # Summary
    /// 抓取原始 K 线行。
    ///
    /// # Logic
    /// 1. 请求 `klines?symbol=&interval=&limit=`。
    /// 2. 响应必须是数组的数组，空数组视为失败。
    async fn fetch_klines(
        &self,
        symbol: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<Vec<KlineRow>, MarketError> {
        let rows: Vec<KlineRow> = self
            .get_json(
                "klines",
                &[
                    ("symbol", symbol.to_string()),
                    ("interval", interval.code().to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;

        if rows.is_empty() {
            return Err(MarketError::Empty);
        }
        debug!(symbol, %interval, rows = rows.len(), "Received raw klines");
        Ok(rows)
    }

    async fn fetch_ticker(&self, symbol: &str) -> Result<TickerPayload, MarketError> {
        self.get_json("ticker/24hr", &[("symbol", symbol.to_string())])
            .await
    }

    async fn fetch_price(&self, symbol: &str) -> Result<PricePayload, MarketError> {
        self.get_json("ticker/price", &[("symbol", symbol.to_string())])
            .await
    }
}
