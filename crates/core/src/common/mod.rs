use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub mod format;
pub mod geometry;
pub mod symbol;
pub mod time;

/// 默认展示的交易对
pub const DEFAULT_SYMBOL: &str = "BTCUSDT";

/// 默认 K 线周期
pub const DEFAULT_INTERVAL: Interval = Interval::Hour1;

/// 单次请求的默认 K 线数量
pub const DEFAULT_LIMIT: usize = 200;

/// 单次请求允许的最大 K 线数量，与交易所 klines 接口上限一致
pub const MAX_LIMIT: usize = 1000;

/// # Summary
/// K 线周期枚举，覆盖交易所支持的 1 分钟到 1 个月的全部周期代码。
///
/// # Invariants
/// - 代码区分大小写：`1m` 为 1 分钟，`1M` 为 1 个月。
/// - 序列化形式即交易所接口使用的周期代码。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "3m")]
    Minute3,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "2h")]
    Hour2,
    #[serde(rename = "4h")]
    Hour4,
    #[serde(rename = "6h")]
    Hour6,
    #[serde(rename = "8h")]
    Hour8,
    #[serde(rename = "12h")]
    Hour12,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "3d")]
    Day3,
    #[serde(rename = "1w")]
    Week1,
    #[serde(rename = "1M")]
    Month1,
}

impl Interval {
    /// 按展示顺序排列的全部周期
    pub const ALL: [Interval; 15] = [
        Interval::Minute1,
        Interval::Minute3,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Minute30,
        Interval::Hour1,
        Interval::Hour2,
        Interval::Hour4,
        Interval::Hour6,
        Interval::Hour8,
        Interval::Hour12,
        Interval::Day1,
        Interval::Day3,
        Interval::Week1,
        Interval::Month1,
    ];

    /// 交易所接口使用的周期代码。
    pub fn code(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute3 => "3m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Minute30 => "30m",
            Interval::Hour1 => "1h",
            Interval::Hour2 => "2h",
            Interval::Hour4 => "4h",
            Interval::Hour6 => "6h",
            Interval::Hour8 => "8h",
            Interval::Hour12 => "12h",
            Interval::Day1 => "1d",
            Interval::Day3 => "3d",
            Interval::Week1 => "1w",
            Interval::Month1 => "1M",
        }
    }

    /// # Summary
    /// 周期对应的秒数。
    ///
    /// # Logic
    /// 1 个月固定按 30 天计算。
    pub fn seconds(&self) -> i64 {
        match self {
            Interval::Minute1 => 60,
            Interval::Minute3 => 180,
            Interval::Minute5 => 300,
            Interval::Minute15 => 900,
            Interval::Minute30 => 1_800,
            Interval::Hour1 => 3_600,
            Interval::Hour2 => 7_200,
            Interval::Hour4 => 14_400,
            Interval::Hour6 => 21_600,
            Interval::Hour8 => 28_800,
            Interval::Hour12 => 43_200,
            Interval::Day1 => 86_400,
            Interval::Day3 => 259_200,
            Interval::Week1 => 604_800,
            Interval::Month1 => 2_592_000,
        }
    }

    /// 供选择界面使用的展示名称。
    pub fn label(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1 Minute",
            Interval::Minute3 => "3 Minutes",
            Interval::Minute5 => "5 Minutes",
            Interval::Minute15 => "15 Minutes",
            Interval::Minute30 => "30 Minutes",
            Interval::Hour1 => "1 Hour",
            Interval::Hour2 => "2 Hours",
            Interval::Hour4 => "4 Hours",
            Interval::Hour6 => "6 Hours",
            Interval::Hour8 => "8 Hours",
            Interval::Hour12 => "12 Hours",
            Interval::Day1 => "1 Day",
            Interval::Day3 => "3 Days",
            Interval::Week1 => "1 Week",
            Interval::Month1 => "1 Month",
        }
    }

    /// # Summary
    /// 宽松解析周期代码。
    ///
    /// # Logic
    /// 1. 尝试严格解析。
    /// 2. 无法识别的代码回退为 1 小时。
    ///
    /// # Arguments
    /// * `code`: 周期代码，例如 `15m`。
    ///
    /// # Returns
    /// 识别出的周期，或 `Interval::Hour1`。
    pub fn parse_or_default(code: &str) -> Self {
        code.parse().unwrap_or(Interval::Hour1)
    }
}

impl Default for Interval {
    fn default() -> Self {
        DEFAULT_INTERVAL
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .iter()
            .copied()
            .find(|interval| interval.code() == s)
            .ok_or_else(|| format!("Unknown Interval: {}", s))
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// # Summary
/// 交易对目录条目，用于填充选择界面。
///
/// # Invariants
/// - 目录是静态的，不会与交易所实时校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingPair {
    // 交易对代码 (例如: BTCUSDT)
    pub symbol: &'static str,
    // 展示名称
    pub name: &'static str,
}

/// 常用交易对目录
pub const TRADING_PAIRS: [TradingPair; 15] = [
    TradingPair {
        symbol: "BTCUSDT",
        name: "Bitcoin",
    },
    TradingPair {
        symbol: "ETHUSDT",
        name: "Ethereum",
    },
    TradingPair {
        symbol: "BNBUSDT",
        name: "BNB",
    },
    TradingPair {
        symbol: "ADAUSDT",
        name: "Cardano",
    },
    TradingPair {
        symbol: "SOLUSDT",
        name: "Solana",
    },
    TradingPair {
        symbol: "XRPUSDT",
        name: "XRP",
    },
    TradingPair {
        symbol: "DOTUSDT",
        name: "Polkadot",
    },
    TradingPair {
        symbol: "DOGEUSDT",
        name: "Dogecoin",
    },
    TradingPair {
        symbol: "AVAXUSDT",
        name: "Avalanche",
    },
    TradingPair {
        symbol: "MATICUSDT",
        name: "Polygon",
    },
    TradingPair {
        symbol: "LINKUSDT",
        name: "Chainlink",
    },
    TradingPair {
        symbol: "UNIUSDT",
        name: "Uniswap",
    },
    TradingPair {
        symbol: "LTCUSDT",
        name: "Litecoin",
    },
    TradingPair {
        symbol: "BCHUSDT",
        name: "Bitcoin Cash",
    },
    TradingPair {
        symbol: "FILUSDT",
        name: "Filecoin",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_codes_round_trip() {
        for interval in Interval::ALL {
            assert_eq!(interval.code().parse::<Interval>(), Ok(interval));
            assert_eq!(interval.to_string(), interval.code());
        }
    }

    #[test]
    fn test_interval_case_sensitive() {
        assert_eq!(Interval::parse_or_default("1m").seconds(), 60);
        assert_eq!(Interval::parse_or_default("1M").seconds(), 2_592_000);
    }

    #[test]
    fn test_unknown_interval_defaults_to_one_hour() {
        assert!("7m".parse::<Interval>().is_err());
        assert_eq!(Interval::parse_or_default("7m"), Interval::Hour1);
        assert_eq!(Interval::parse_or_default("").seconds(), 3_600);
    }

    #[test]
    fn test_interval_serde_uses_exchange_code() {
        let json = serde_json::to_string(&Interval::Month1).unwrap();
        assert_eq!(json, "\"1M\"");
        let parsed: Interval = serde_json::from_str("\"15m\"").unwrap();
        assert_eq!(parsed, Interval::Minute15);
    }

    #[test]
    fn test_catalog_symbols_unique() {
        let mut symbols: Vec<&str> = TRADING_PAIRS.iter().map(|p| p.symbol).collect();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), TRADING_PAIRS.len());
        assert!(symbols.contains(&DEFAULT_SYMBOL));
    }
}
