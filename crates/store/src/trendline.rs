use chartfeed_core::cache::error::StorageError;
use chartfeed_core::cache::port::{KeyValueStore, KeyValueStoreExt};
use chartfeed_core::config::TRENDLINE_KEY;
use chartfeed_core::trendline::entity::Trendline;
use std::sync::Arc;
use tracing::{error, info, warn};

/// # Summary
/// 趋势线持久化，通过注入的键值存储以单个 JSON 数组整体读写。
///
/// # Invariants
/// - 所有趋势线保存在同一个固定键下，每次保存整体覆盖。
/// - 渲染句柄不参与持久化。
/// - 对外接口从不返回错误：保存以 bool 报告，读取失败视为空集合。
pub struct TrendlineStore {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl TrendlineStore {
    /// 使用默认键 `tradingChart_trendlines` 创建存储。
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, TRENDLINE_KEY)
    }

    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// 校验趋势线是否可被接受，由调用方在保存前使用。
    pub fn validate(trendline: &Trendline) -> bool {
        trendline.is_valid()
    }

    /// # Summary
    /// 整体保存趋势线集合。
    ///
    /// # Logic
    /// 1. 逐条剥离渲染句柄，包括 `extra` 中残留的 `series` 键。
    /// 2. 以 JSON 数组写入固定键，序列化失败时不触碰已有数据。
    /// 3. 任一失败返回 false。
    ///
    /// # Arguments
    /// * `trendlines`: 完整的趋势线集合。
    ///
    /// # Returns
    /// 写入成功返回 true。
    pub async fn save(&self, trendlines: &[Trendline]) -> bool {
        let detached: Vec<Trendline> = trendlines.iter().map(Trendline::detached).collect();

        match self.store.set_json(&self.key, &detached).await {
            Ok(()) => {
                info!(count = detached.len(), key = %self.key, "Saved trendlines");
                true
            }
            Err(e) => {
                error!(error = %e, key = %self.key, "Failed to save trendlines");
                false
            }
        }
    }

    /// # Summary
    /// 读取趋势线集合。
    ///
    /// # Logic
    /// 1. 键不存在返回空集合。
    /// 2. 读取或反序列化失败记录告警并返回空集合。
    ///
    /// # Returns
    /// 已保存的趋势线，渲染句柄均为 None。
    pub async fn load(&self) -> Vec<Trendline> {
        match self.store.get_json::<Vec<Trendline>>(&self.key).await {
            Ok(Some(trendlines)) => {
                info!(count = trendlines.len(), key = %self.key, "Loaded trendlines");
                trendlines.iter().map(Trendline::detached).collect()
            }
            Ok(None) => Vec::new(),
            Err(StorageError::Deserialize(e)) => {
                warn!(error = %e, key = %self.key, "Stored trendlines are corrupt, ignoring");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, key = %self.key, "Failed to read trendlines");
                Vec::new()
            }
        }
    }
}
