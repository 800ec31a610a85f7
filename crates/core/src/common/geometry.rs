use serde::{Deserialize, Serialize};

/// # Summary
/// 二维平面上的点，用于趋势线拖拽时的命中检测。
///
/// # Invariants
/// - 坐标系由调用方决定（通常为屏幕像素）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// 两点间的欧氏距离。
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// # Summary
/// 计算点到线段的最短距离。
///
/// # Logic
/// 1. 将点投影到线段所在直线上，得到投影参数 `t`。
/// 2. 将 `t` 截断到 `[0, 1]`，保证落点在线段上而非无限延长线上。
/// 3. 返回点到落点的欧氏距离。
/// 4. 线段退化为一个点时，直接返回两点距离。
///
/// # Arguments
/// * `point`: 待检测的点。
/// * `start`: 线段起点。
/// * `end`: 线段终点。
///
/// # Returns
/// 非负距离。
pub fn distance_to_line(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq == 0.0 {
        return point.distance(&start);
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    let foot = Point::new(start.x + t * dx, start.y + t * dy);
    point.distance(&foot)
}

/// 两个锚点之间的斜率（价格 / 秒），时间差为 0 时返回 0。
pub fn slope(start_time: f64, start_price: f64, end_time: f64, end_price: f64) -> f64 {
    let time_diff = end_time - start_time;
    if time_diff == 0.0 {
        0.0
    } else {
        (end_price - start_price) / time_diff
    }
}
