use crate::cache::error::StorageError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// # Summary
/// 业务无关的异步字符串键值存储接口 (Port)，对应浏览器端的 localStorage。
///
/// # Invariants
/// - 处理原始字符串，确保 Trait 是对象安全的 (Object Safe)。
/// - 不提供事务语义，并发写入以最后一次为准。
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// # Summary
    /// 读取指定键。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    ///
    /// # Returns
    /// 存在则返回 `Some(String)`，否则返回 `None`。
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Summary
    /// 整体覆盖写入指定键。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    /// * `value`: 文本值。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `StorageError`。
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// 删除指定键，键不存在时同样返回 Ok。
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// # Summary
/// 键值存储的 JSON 扩展接口。
///
/// # Invariants
/// - 自动为所有实现 `KeyValueStore` 的类型提供支持。
#[async_trait]
pub trait KeyValueStoreExt: KeyValueStore {
    /// # Summary
    /// 存入强类型对象。
    ///
    /// # Logic
    /// 1. 使用 JSON 序列化对象，失败时不触碰底层存储。
    /// 2. 调用底层 `set` 写入。
    async fn set_json<T: Serialize + Send + Sync + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StorageError> {
        let text =
            serde_json::to_string(value).map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.set(key, text).await
    }

    /// # Summary
    /// 取出强类型对象。
    ///
    /// # Logic
    /// 1. 调用底层 `get` 获取文本。
    /// 2. 使用 JSON 反序列化为目标类型。
    async fn get_json<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StorageError> {
        match self.get(key).await? {
            Some(text) => {
                let val = serde_json::from_str(&text)
                    .map_err(|e| StorageError::Deserialize(e.to_string()))?;
                Ok(Some(val))
            }
            None => Ok(None),
        }
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStoreExt for T {}
