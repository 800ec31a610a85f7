use crate::common::symbol::SymbolProfile;
use chrono::DateTime;

/// 按交易对精度格式化价格。
pub fn format_price(price: f64, symbol: &str) -> String {
    let precision = usize::from(SymbolProfile::for_symbol(symbol).precision);
    format!("{:.*}", precision, price)
}

/// # Summary
/// 将成交量格式化为带 K/M/B 后缀的可读文本。
///
/// # Logic
/// 1. 从十亿开始依次比较阈值，命中即缩放并附加后缀。
/// 2. 小于一千时直接保留两位小数。
pub fn format_volume(volume: f64) -> String {
    if volume >= 1_000_000_000.0 {
        format!("{:.2}B", volume / 1_000_000_000.0)
    } else if volume >= 1_000_000.0 {
        format!("{:.2}M", volume / 1_000_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.2}K", volume / 1_000.0)
    } else {
        format!("{:.2}", volume)
    }
}

/// # Summary
/// 格式化带符号的百分比。
///
/// # Logic
/// 1. 非负数加 `+` 前缀，负数保留自身的 `-`。
/// 2. 负零按零处理，避免输出 `+-0.00%`。
pub fn format_percentage(percentage: f64) -> String {
    let value = if percentage == 0.0 { 0.0 } else { percentage };
    let sign = if value >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, value)
}

/// 将秒级时间戳格式化为 UTC 时间文本，超出范围时原样输出数字。
pub fn format_timestamp(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

/// 趋势线锚点等浮点时间戳的格式化，非有限值原样输出。
#[allow(clippy::cast_possible_truncation)]
pub fn format_anchor_time(timestamp: f64) -> String {
    if !timestamp.is_finite() {
        return timestamp.to_string();
    }
    // 越界时 `as` 饱和到 i64 边界，再由 format_timestamp 原样输出
    format_timestamp(timestamp.floor() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_volume_suffixes() {
        assert_eq!(format_volume(1_500_000.0), "1.50M");
        assert_eq!(format_volume(999.0), "999.00");
        assert_eq!(format_volume(2_340.0), "2.34K");
        assert_eq!(format_volume(7_250_000_000.0), "7.25B");
        assert_eq!(format_volume(0.0), "0.00");
    }

    #[test]
    fn test_format_percentage_sign() {
        assert_eq!(format_percentage(-3.456), "-3.46%");
        assert_eq!(format_percentage(2.0), "+2.00%");
        assert_eq!(format_percentage(0.0), "+0.00%");
        assert_eq!(format_percentage(-0.0), "+0.00%");
    }

    #[test]
    fn test_format_price_uses_symbol_precision() {
        assert_eq!(format_price(43_123.456, "BTCUSDT"), "43123.46");
        assert_eq!(format_price(0.5, "XRPUSDT"), "0.500000");
        assert_eq!(format_price(12.0, "UNKNOWN"), "12.00");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20");
        assert_eq!(format_timestamp(i64::MAX), i64::MAX.to_string());
    }

    #[test]
    fn test_format_anchor_time() {
        assert_eq!(format_anchor_time(1_700_000_000.9), "2023-11-14 22:13:20");
        assert_eq!(format_anchor_time(f64::NAN), "NaN");
    }
}
