use async_trait::async_trait;
use chartfeed_core::cache::error::StorageError;
use chartfeed_core::cache::port::KeyValueStore;
use dashmap::DashMap;

/// # Summary
/// 基于 DashMap 的内存键值存储实现。
///
/// # Invariants
/// - 所有操作均通过并发哈希表 `DashMap` 执行，保证多线程安全。
/// - 进程退出后数据丢失。
#[derive(Default)]
pub struct MemStore {
    // 线程安全的 KV 存储容器
    storage: DashMap<String, String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemStore {
    /// 写入键值，若存在同名 Key 则覆盖。
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.storage.insert(key.to_string(), value);
        Ok(())
    }

    /// 检索 Key 对应的值，克隆为独立的所有权对象返回。
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.storage.get(key).map(|v| v.value().clone()))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage.remove(key);
        Ok(())
    }
}
