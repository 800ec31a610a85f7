use std::time::Duration;
use thiserror::Error;

/// # Summary
/// 市场数据域错误枚举，处理网络、超时、解析及数据缺失等问题。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
/// - 仅在端口内部传播，对外操作会将其折叠为回退数据或 `None`。
#[derive(Error, Debug, Clone)]
pub enum MarketError {
    // 网络层错误，包含底层 HTTP 客户端错误信息
    #[error("Network error: {0}")]
    Network(String),
    // 请求在限定时间内未完成
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    // 交易所返回非成功状态码
    #[error("HTTP status {0}")]
    Status(u16),
    // 数据解析错误，如 JSON 格式不匹配或数值无法解析
    #[error("Parse error: {0}")]
    Parse(String),
    // 响应为空或全部数据行均无效
    #[error("Empty response")]
    Empty,
    // 未知或未分类的错误
    #[error("Unknown error: {0}")]
    Unknown(String),
}
