use crate::cache::error::CacheError;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// # Summary
/// 带过期语义的异步 KV 缓存接口 (Port)。
///
/// # Invariants
/// - 处理原始字节，确保 Trait 是对象安全的 (Object Safe)。
/// - TTL 属于缓存实例本身：`get_raw` 只返回仍在有效期内的条目，过期条目视同不存在。
/// - 不提供淘汰、容量上限或并发写保护，同一键的并发写入以最后一次为准。
#[async_trait]
pub trait Cache: Send + Sync {
    /// # Summary
    /// 写入原始字节数据，覆盖同名条目并刷新其写入时间。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    /// * `value`: 原始字节数组。
    ///
    /// # Returns
    /// 成功返回 Ok，失败返回 `CacheError`。
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;

    /// # Summary
    /// 获取仍然新鲜的原始字节数据。
    ///
    /// # Logic
    /// 1. 条目不存在返回 `None`。
    /// 2. 条目写入时间距今超过 TTL 返回 `None`。
    ///
    /// # Arguments
    /// * `key`: 唯一键。
    ///
    /// # Returns
    /// 命中返回 `Some(Vec<u8>)`，否则返回 `None`。
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// # Summary
    /// 删除指定键，键不存在时同样返回 Ok。
    async fn del(&self, key: &str) -> Result<(), CacheError>;

    /// # Summary
    /// 清空该缓存实例下的全部条目。
    async fn clear(&self) -> Result<(), CacheError>;
}

/// # Summary
/// 缓存泛型扩展接口，提供便捷的 JSON 序列化支持。
///
/// # Invariants
/// - 自动为所有实现 `Cache` 的类型提供支持。
#[async_trait]
pub trait CacheExt: Cache {
    /// # Summary
    /// 存入强类型对象。
    ///
    /// # Logic
    /// 1. 使用 JSON 序列化对象。
    /// 2. 调用底层 `set_raw` 写入。
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value).map_err(|e| CacheError::Serialize(e.to_string()))?;
        self.set_raw(key, bytes).await
    }

    /// # Summary
    /// 取出强类型对象。
    ///
    /// # Logic
    /// 1. 调用底层 `get_raw` 获取新鲜字节。
    /// 2. 使用 JSON 反序列化为目标类型。
    async fn get<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.get_raw(key).await? {
            Some(bytes) => {
                let val = serde_json::from_slice(&bytes)
                    .map_err(|e| CacheError::Deserialize(e.to_string()))?;
                Ok(Some(val))
            }
            None => Ok(None),
        }
    }
}

impl<T: Cache + ?Sized> CacheExt for T {}
