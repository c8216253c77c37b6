use thiserror::Error;

/// # Summary
/// 缓存域错误枚举，处理序列化、非法键及底层文件系统故障。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum CacheError {
    // 数据序列化失败
    #[error("Serialize error: {0}")]
    Serialize(String),
    // 数据反序列化失败 (缓存文件内容损坏)
    #[error("Deserialize error: {0}")]
    Deserialize(String),
    // 键无法映射为合法的文件名
    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),
    // 底层存储故障 (读写、重命名、元数据)
    #[error("Storage error: {0}")]
    Storage(String),
}
