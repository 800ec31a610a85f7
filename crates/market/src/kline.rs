use chartfeed_core::market::entity::{Candle, KlineRow};
use serde_json::Value;
use tracing::warn;

/// 一行 K 线被丢弃的原因
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    // 行长度不足 6 列
    TooShort(usize),
    // 某列不是数值
    NotNumeric(&'static str),
    // 违反 OHLC 不变量
    Invariant,
    // 时间不晚于上一根已保留的 K 线
    OutOfOrder(i64),
}

const FIELDS: [&str; 5] = ["open", "high", "low", "close", "volume"];

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

fn open_time_ms(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// # Summary
/// 将一行交易所原始数据转换为 K 线。
///
/// # Logic
/// 1. 第 0 列为毫秒开盘时间，向下取整为秒。
/// 2. 第 1..=5 列依次为开高低收量，可为字符串或数字。
/// 3. 结果必须满足 `Candle::is_valid`。
///
/// # Arguments
/// * `row`: 原始数据行。
///
/// # Returns
/// 合法时返回 K 线，否则返回丢弃原因。
pub fn parse_row(row: &[Value]) -> Result<Candle, RowRejection> {
    if row.len() < 6 {
        return Err(RowRejection::TooShort(row.len()));
    }

    let time = open_time_ms(&row[0]).ok_or(RowRejection::NotNumeric("time"))?;
    let mut values = [0.0_f64; 5];
    for (slot, (name, raw)) in values.iter_mut().zip(FIELDS.iter().zip(&row[1..6])) {
        *slot = number(raw).ok_or(RowRejection::NotNumeric(*name))?;
    }
    let [open, high, low, close, volume] = values;

    let candle = Candle {
        time: time.div_euclid(1000),
        open,
        high,
        low,
        close,
        volume,
    };
    if candle.is_valid() {
        Ok(candle)
    } else {
        Err(RowRejection::Invariant)
    }
}

/// # Summary
/// 转换整批原始行，逐行丢弃不合法的数据而不是整批失败。
///
/// # Logic
/// 1. 逐行调用 `parse_row`，失败的行记录告警后跳过。
/// 2. 保证输出时间严格递增，重复或倒序的行同样丢弃。
///
/// # Arguments
/// * `symbol`: 交易对代码，仅用于日志。
/// * `rows`: 原始数据行。
///
/// # Returns
/// 通过校验的 K 线序列，可能为空。
pub fn parse_rows(symbol: &str, rows: &[KlineRow]) -> Vec<Candle> {
    let mut candles: Vec<Candle> = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let parsed = parse_row(row).and_then(|candle| match candles.last() {
            Some(prev) if candle.time <= prev.time => Err(RowRejection::OutOfOrder(candle.time)),
            _ => Ok(candle),
        });
        match parsed {
            Ok(candle) => candles.push(candle),
            Err(reason) => warn!(symbol, index, ?reason, "Dropping invalid kline row"),
        }
    }
    candles
}
