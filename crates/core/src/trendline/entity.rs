use crate::common::geometry;
use serde::{Deserialize, Serialize};

/// # Summary
/// 趋势线锚点，以 (时间, 价格) 定位在价格序列上。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    // UTC 秒级时间戳
    pub time: f64,
    pub price: f64,
}

/// 渲染句柄在 JSON 中的字段名，持久化时必须剥离
pub const SERIES_FIELD: &str = "series";

/// # Summary
/// 图表库为每条已绘制趋势线分配的渲染句柄。
///
/// # Invariants
/// - 仅在当前会话内有效，永远不参与持久化。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesHandle(pub u64);

/// # Summary
/// 用户在价格图上绘制的两点趋势线。
///
/// # Invariants
/// - 被接受前需满足 `start.time < end.time` 且两端价格为正，四个数值均为有限值。
/// - `series` 为瞬态渲染句柄，序列化时被剥离，反序列化后为 None。
/// - 未识别的展示字段保存在 `extra` 中原样往返，`series` 键除外。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trendline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub start: Anchor,
    pub end: Anchor,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    #[serde(skip)]
    pub series: Option<SeriesHandle>,
}

fn default_color() -> String {
    "#2962FF".to_string()
}

fn default_line_width() -> f64 {
    2.0
}

impl Trendline {
    /// 以默认展示样式创建趋势线。
    pub fn new(start: Anchor, end: Anchor) -> Self {
        Self {
            id: None,
            start,
            end,
            color: default_color(),
            line_width: default_line_width(),
            extra: serde_json::Map::new(),
            series: None,
        }
    }

    /// # Summary
    /// 校验趋势线是否可被接受。
    ///
    /// # Logic
    /// 1. 四个数值字段必须为有限值。
    /// 2. 起点时间严格早于终点时间。
    /// 3. 两端价格为正。
    pub fn is_valid(&self) -> bool {
        let fields = [self.start.time, self.start.price, self.end.time, self.end.price];
        fields.iter().all(|v| v.is_finite())
            && self.start.time < self.end.time
            && self.start.price > 0.0
            && self.end.price > 0.0
    }

    /// 每秒价格变化量。
    pub fn slope(&self) -> f64 {
        geometry::slope(self.start.time, self.start.price, self.end.time, self.end.price)
    }

    /// 返回剥离渲染句柄后的副本，`extra` 中残留的 `series` 键一并移除。
    pub fn detached(&self) -> Self {
        let mut line = Self {
            series: None,
            ..self.clone()
        };
        line.extra.remove(SERIES_FIELD);
        line
    }
}
