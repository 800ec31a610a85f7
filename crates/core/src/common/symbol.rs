/// # Summary
/// 交易对的行情画像，用于生成模拟数据和格式化价格。
///
/// # Invariants
/// - `base_price`、`volatility`、`base_volume` 均为正数。
/// - 未收录的交易对使用统一默认值。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymbolProfile {
    // 模拟行情的起始价格
    pub base_price: f64,
    // 单根 K 线的相对波动率
    pub volatility: f64,
    // 单根 K 线的基准成交量
    pub base_volume: f64,
    // 价格小数位数
    pub precision: u8,
}

impl SymbolProfile {
    /// 未收录交易对的默认画像
    pub const DEFAULT: SymbolProfile = SymbolProfile {
        base_price: 100.0,
        volatility: 0.05,
        base_volume: 1_000_000.0,
        precision: 2,
    };

    /// # Summary
    /// 查询交易对的行情画像。
    ///
    /// # Logic
    /// 1. 按交易对代码匹配静态表。
    /// 2. 未命中时返回 `SymbolProfile::DEFAULT`。
    ///
    /// # Arguments
    /// * `symbol`: 交易对代码。
    ///
    /// # Returns
    /// 对应的行情画像。
    pub fn for_symbol(symbol: &str) -> Self {
        let (base_price, volatility, base_volume, precision) = match symbol {
            "BTCUSDT" => (43_000.0, 0.03, 1_000_000.0, 2),
            "ETHUSDT" => (2_300.0, 0.04, 500_000.0, 2),
            "BNBUSDT" => (310.0, 0.05, 200_000.0, 2),
            "ADAUSDT" => (0.38, 0.06, 10_000_000.0, 6),
            "SOLUSDT" => (98.0, 0.07, 300_000.0, 2),
            "XRPUSDT" => (0.52, 0.05, 50_000_000.0, 6),
            "DOTUSDT" => (5.8, 0.06, 1_000_000.0, 2),
            "DOGEUSDT" => (0.08, 0.08, 100_000_000.0, 6),
            "AVAXUSDT" => (24.0, 0.07, 500_000.0, 2),
            "MATICUSDT" => (0.73, 0.06, 5_000_000.0, 6),
            _ => return Self::DEFAULT,
        };
        Self {
            base_price,
            volatility,
            base_volume,
            precision,
        }
    }

    /// 最小价格变动单位，即 `10^-precision`。
    pub fn tick(&self) -> f64 {
        10f64.powi(-i32::from(self.precision))
    }

    /// 按该交易对的精度四舍五入价格。
    pub fn round_price(&self, price: f64) -> f64 {
        round_to(price, self.precision)
    }
}

/// 四舍五入到指定小数位。
pub fn round_to(value: f64, decimals: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimals));
    (value * factor).round() / factor
}
