use thiserror::Error;

/// # Summary
/// SNMP 轮询错误枚举。
///
/// # Invariants
/// - 服务层把所有变体一律折叠为 "无结果"，HTTP 客户端看不到具体原因，
///   这里保留区分仅用于日志。
#[derive(Error, Debug)]
pub enum SnmpError {
    // 主机名解析失败
    #[error("Cannot resolve {0}")]
    Resolve(String),
    // 套接字收发失败或超时
    #[error("Transport error: {0}")]
    Transport(String),
    // 代理返回了非零 error-status
    #[error("Agent error status {0}")]
    Agent(u32),
    // noSuchObject / noSuchInstance
    #[error("No such object: {0}")]
    NoSuchObject(String),
    // endOfMibView
    #[error("End of MIB view")]
    EndOfMib,
    // 响应无法解码
    #[error("Decode error: {0}")]
    Decode(String),
}
