use chartfeed_core::common::{Interval, MAX_LIMIT};
use chartfeed_core::common::symbol::{SymbolProfile, round_to};
use chartfeed_core::common::time::{RealTimeProvider, TimeProvider};
use chartfeed_core::market::entity::Candle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::debug;

/// 模拟序列的默认步长
pub const SYNTHETIC_STEP: Interval = Interval::Hour1;

// 最高/最低价影线相对波动率的比例
const WICK_FACTOR: f64 = 0.3;
// 价格下限，相对当前价格
const PRICE_FLOOR: f64 = 0.01;

/// # Summary
/// 模拟 K 线生成器，在网络不可用时提供形态可信的 OHLCV 序列。
///
/// # Invariants
/// - 生成的每根 K 线都满足 OHLC 不变量，且所有价格严格为正。
/// - 每根 K 线的开盘价等于上一根的收盘价（随机游走）。
/// - 随机源由外部注入，相同种子与时钟产生相同序列。
pub struct SyntheticGenerator<R = StdRng> {
    // 随机源
    rng: R,
    // 序列结束时刻的来源
    clock: Arc<dyn TimeProvider>,
}

impl SyntheticGenerator<StdRng> {
    /// 使用固定种子创建可复现的生成器。
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed), Arc::new(RealTimeProvider))
    }

    /// 使用操作系统熵源创建生成器。
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng(), Arc::new(RealTimeProvider))
    }
}

impl<R: Rng> SyntheticGenerator<R> {
    pub fn new(rng: R, clock: Arc<dyn TimeProvider>) -> Self {
        Self { rng, clock }
    }

    /// 替换时钟，主要用于测试。
    pub fn with_clock(mut self, clock: Arc<dyn TimeProvider>) -> Self {
        self.clock = clock;
        self
    }

    /// 以 1 小时步长生成 `limit` 根 K 线。
    pub fn generate(&mut self, symbol: &str, limit: usize) -> Vec<Candle> {
        self.generate_with_step(symbol, limit, SYNTHETIC_STEP)
    }

    /// # Summary
    /// 以指定步长生成 `limit` 根 K 线。
    ///
    /// # Logic
    /// 1. 读取交易对画像，以基准价作为游走起点。
    /// 2. `limit` 超过 `MAX_LIMIT` 时截断，从“当前时刻 - (limit-1) 个步长”开始按时间升序逐根生成。
    /// 3. 收盘价 = max(开盘价 + U(-0.5,0.5)·波动率·现价, 1% 现价)。
    /// 4. 影线长度 = U(0,1)·波动率·现价·0.3，最低价不低于 1% 现价。
    /// 5. 成交量 = 基准量·U(0.5,1.5)，保留两位小数。
    /// 6. 价格按交易对精度四舍五入，且不低于一个最小变动单位。
    ///
    /// # Arguments
    /// * `symbol`: 交易对代码。
    /// * `limit`: K 线数量。
    /// * `step`: 相邻 K 线的时间间隔。
    ///
    /// # Returns
    /// 时间严格递增、长度恰为 `min(limit, MAX_LIMIT)` 的序列。
    pub fn generate_with_step(&mut self, symbol: &str, limit: usize, step: Interval) -> Vec<Candle> {
        let limit = limit.min(MAX_LIMIT);
        let profile = SymbolProfile::for_symbol(symbol);
        let tick = profile.tick();
        let step_secs = step.seconds();
        let now = self.clock.now().timestamp();

        let mut current = profile.base_price;
        let mut candles = Vec::with_capacity(limit);

        for back in (0..limit).rev() {
            let offset = i64::try_from(back)
                .unwrap_or(i64::MAX)
                .saturating_mul(step_secs);
            let time = now.saturating_sub(offset);

            let open = current;
            let change = self.rng.random_range(-0.5_f64..0.5) * profile.volatility * current;
            let close = (open + change).max(current * PRICE_FLOOR);

            let wick = profile.volatility * current * WICK_FACTOR;
            let high = open.max(close) + self.rng.random::<f64>() * wick;
            let low = (open.min(close) - self.rng.random::<f64>() * wick).max(current * PRICE_FLOOR);

            let volume = profile.base_volume * self.rng.random_range(0.5_f64..1.5);

            // 四舍五入单调不减，截断到 tick 后大小关系保持不变
            let price = |v: f64| profile.round_price(v).max(tick);
            candles.push(Candle {
                time,
                open: price(open),
                high: price(high),
                low: price(low),
                close: price(close),
                volume: round_to(volume, 2),
            });

            current = close;
        }

        debug!(symbol, limit, step = %step, "Generated synthetic candles");
        candles
    }
}
