use thiserror::Error;

/// # Summary
/// 存储层错误枚举，处理种子文件与报告文件的读写失败。
///
/// # Invariants
/// - 必须通过 `thiserror` 派生 `Error` trait。
#[derive(Error, Debug)]
pub enum StoreError {
    /// 文件读写失败
    #[error("I/O error: {0}")]
    Io(String),
    /// JSON 内容无法解析或序列化
    #[error("Format error: {0}")]
    Format(String),
    /// 标识符包含非法字符
    #[error("Invalid identifier: {0}")]
    InvalidId(String),
}
