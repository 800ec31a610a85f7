use crate::common::{DEFAULT_INTERVAL, DEFAULT_LIMIT, DEFAULT_SYMBOL, Interval, MAX_LIMIT};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// 趋势线在键值存储中的固定键
pub const TRENDLINE_KEY: &str = "tradingChart_trendlines";

/// 配置校验错误
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// 全局应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub chart: ChartConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

/// 行情抓取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
    pub max_attempts: usize,
    pub backoff_base_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub default_symbol: String,
    pub default_interval: Interval,
    pub default_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub trendline_key: String,
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    // 设置后按天滚动写入该目录，否则输出到 stdout
    pub dir: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com/api/v3".to_string(),
            request_timeout_secs: 10,
            max_attempts: 3,
            backoff_base_secs: 2,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            default_symbol: DEFAULT_SYMBOL.to_string(),
            default_interval: DEFAULT_INTERVAL,
            default_limit: DEFAULT_LIMIT,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            trendline_key: TRENDLINE_KEY.to_string(),
            data_dir: "data".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl FeedConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn backoff_base(&self) -> Duration {
        Duration::from_secs(self.backoff_base_secs)
    }
}

impl AppConfig {
    /// # Summary
    /// 校验配置取值。
    ///
    /// # Logic
    /// 1. 请求超时、重试次数与默认数量必须为正。
    /// 2. 接口地址与趋势线键不能为空。
    ///
    /// # Returns
    /// 首个不合法字段对应的 `ConfigError`。
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> Result<(), ConfigError> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            })
        }

        if self.feed.base_url.trim().is_empty() {
            return invalid("feed.base_url", "must not be empty");
        }
        if self.feed.request_timeout_secs == 0 {
            return invalid("feed.request_timeout_secs", "must be positive");
        }
        if self.feed.max_attempts == 0 {
            return invalid("feed.max_attempts", "must be at least 1");
        }
        if self.chart.default_limit == 0 {
            return invalid("chart.default_limit", "must be positive");
        }
        if self.chart.default_limit > MAX_LIMIT {
            return invalid("chart.default_limit", "must not exceed 1000");
        }
        if self.chart.default_symbol.trim().is_empty() {
            return invalid("chart.default_symbol", "must not be empty");
        }
        if self.storage.trendline_key.is_empty() {
            return invalid("storage.trendline_key", "must not be empty");
        }
        Ok(())
    }
}
