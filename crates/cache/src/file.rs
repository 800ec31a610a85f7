use async_trait::async_trait;
use chartfeed_core::cache::error::StorageError;
use chartfeed_core::cache::port::KeyValueStore;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// # Summary
/// 基于本地文件的键值存储，每个键对应根目录下的一个文件。
///
/// # Invariants
/// - 键只允许字母、数字、`_`、`-`、`.`，防止路径穿越。
/// - 写入先落到临时文件再重命名，读者不会看到半写入的内容。
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// # Summary
    /// 创建文件存储。
    ///
    /// # Logic
    /// 1. 仅记录根目录，首次写入时才创建目录。
    ///
    /// # Arguments
    /// * `root`: 数据根目录。
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.');
        if key.is_empty() || key.starts_with('.') || !key.chars().all(allowed) {
            return Err(StorageError::Storage(format!("invalid key: {:?}", key)));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

fn io_error(err: std::io::Error) -> StorageError {
    StorageError::Storage(err.to_string())
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(e)),
        }
    }

    /// # Summary
    /// 整体覆盖写入。
    ///
    /// # Logic
    /// 1. 确保根目录存在。
    /// 2. 写入 `<key>.json.tmp` 后原子重命名为 `<key>.json`。
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.root).await.map_err(io_error)?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value.as_bytes()).await.map_err(io_error)?;
        tokio::fs::rename(&tmp, &path).await.map_err(io_error)?;
        debug!(path = %path.display(), bytes = value.len(), "Wrote key");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }
}
