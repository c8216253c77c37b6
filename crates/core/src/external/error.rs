use thiserror::Error;

/// # Summary
/// 外部数据源错误枚举，覆盖网络、HTTP 状态、解析和上游拒绝等情况。
///
/// # Invariants
/// - 该错误只在适配器与 `ExternalData` 之间流动，不会透传给 HTTP 客户端。
#[derive(Error, Debug)]
pub enum FeedError {
    // 网络层错误 (连接失败、超时)
    #[error("Network error: {0}")]
    Network(String),
    // 上游返回非 2xx 状态
    #[error("HTTP status {0}")]
    Status(u16),
    // 响应体不符合预期结构
    #[error("Parse error: {0}")]
    Parse(String),
    // 上游明确表示没有数据
    #[error("No data: {0}")]
    NoData(String),
}
