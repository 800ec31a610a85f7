use crate::market::error::MarketError;
use serde::{Deserialize, Serialize};

/// # Summary
/// 交易所返回的原始 K 线行：`[openTimeMs, open, high, low, close, volume, ...]`。
///
/// # Invariants
/// - 价格与成交量通常为字符串编码的数字，解析与校验由上游负责。
pub type KlineRow = Vec<serde_json::Value>;

/// # Summary
/// 单根 K 线数据实体，记录特定时段内的行情波动。
///
/// # Invariants
/// - `low <= min(open, close)`，`high >= max(open, close)`，`high >= low`。
/// - 六个字段均为有限数值，价格为正，成交量非负。
/// - 序列内 `time` 严格递增。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    // K 线开始时间（UTC 秒级时间戳）
    pub time: i64,
    // 开盘价
    pub open: f64,
    // 最高价
    pub high: f64,
    // 最低价
    pub low: f64,
    // 收盘价
    pub close: f64,
    // 成交量
    pub volume: f64,
}

impl Candle {
    /// # Summary
    /// 校验 K 线是否满足 OHLC 不变量。
    ///
    /// # Logic
    /// 1. 所有价格与成交量必须为有限值，时间非负。
    /// 2. 价格为正，成交量非负。
    /// 3. `high >= low`，且 `[low, high]` 覆盖开盘价与收盘价。
    ///
    /// # Returns
    /// 满足全部约束时返回 true。
    pub fn is_valid(&self) -> bool {
        let fields = [self.open, self.high, self.low, self.close, self.volume];
        if self.time < 0 || fields.iter().any(|v| !v.is_finite()) {
            return false;
        }
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return false;
        }
        if self.volume < 0.0 {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open.max(self.close)
            && self.low <= self.open.min(self.close)
    }
}

/// # Summary
/// 24 小时行情统计快照。
///
/// # Invariants
/// - 每次请求即用即弃，不做缓存。
/// - 统计不可用时由上层返回 `None`，绝不以零值填充。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub symbol: String,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub last_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub open_price: f64,
    pub volume: f64,
    // 以下字段在交易所响应中存在且可解析时填充
    pub weighted_avg_price: Option<f64>,
    pub prev_close_price: Option<f64>,
    pub bid_price: Option<f64>,
    pub ask_price: Option<f64>,
    pub quote_volume: Option<f64>,
    pub open_time: Option<i64>,
    pub close_time: Option<i64>,
    pub count: Option<u64>,
}

/// # Summary
/// `/ticker/24hr` 接口的原始响应体，数值字段以字符串编码。
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerPayload {
    pub symbol: String,
    pub price_change: String,
    pub price_change_percent: String,
    pub last_price: String,
    pub high_price: String,
    pub low_price: String,
    pub open_price: String,
    pub volume: String,
    #[serde(default)]
    pub weighted_avg_price: Option<String>,
    #[serde(default)]
    pub prev_close_price: Option<String>,
    #[serde(default)]
    pub bid_price: Option<String>,
    #[serde(default)]
    pub ask_price: Option<String>,
    #[serde(default)]
    pub quote_volume: Option<String>,
    #[serde(default)]
    pub open_time: Option<i64>,
    #[serde(default)]
    pub close_time: Option<i64>,
    #[serde(default)]
    pub count: Option<u64>,
}

/// `/ticker/price` 接口的原始响应体。
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PricePayload {
    pub symbol: String,
    pub price: String,
}

fn parse_field(name: &str, raw: &str) -> Result<f64, MarketError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MarketError::Parse(format!("{}: {:?} is not a finite number", name, raw)))
}

fn parse_optional(raw: Option<&String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

impl TryFrom<TickerPayload> for Stats {
    type Error = MarketError;

    /// # Summary
    /// 将原始响应转换为统计快照。
    ///
    /// # Logic
    /// 1. 核心字段任一无法解析即整体失败。
    /// 2. 扩展字段解析失败时置为 None。
    fn try_from(payload: TickerPayload) -> Result<Self, Self::Error> {
        Ok(Self {
            price_change: parse_field("priceChange", &payload.price_change)?,
            price_change_percent: parse_field("priceChangePercent", &payload.price_change_percent)?,
            last_price: parse_field("lastPrice", &payload.last_price)?,
            high_price: parse_field("highPrice", &payload.high_price)?,
            low_price: parse_field("lowPrice", &payload.low_price)?,
            open_price: parse_field("openPrice", &payload.open_price)?,
            volume: parse_field("volume", &payload.volume)?,
            weighted_avg_price: parse_optional(payload.weighted_avg_price.as_ref()),
            prev_close_price: parse_optional(payload.prev_close_price.as_ref()),
            bid_price: parse_optional(payload.bid_price.as_ref()),
            ask_price: parse_optional(payload.ask_price.as_ref()),
            quote_volume: parse_optional(payload.quote_volume.as_ref()),
            open_time: payload.open_time,
            close_time: payload.close_time,
            count: payload.count,
            symbol: payload.symbol,
        })
    }
}

impl PricePayload {
    /// 解析最新成交价。
    pub fn parse_price(&self) -> Result<f64, MarketError> {
        parse_field("price", &self.price)
    }
}
