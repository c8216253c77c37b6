use super::entity::{Oid, SnmpTarget, SnmpValue, VarBind};
use super::error::SnmpError;
use async_trait::async_trait;

/// # Summary
/// SNMP 代理访问接口 (Port)。
///
/// # Invariants
/// - 每次调用对应一次独立的请求/响应往返，不复用会话、不重试、不批量。
/// - 实现者必须是 `Send + Sync`，以便在 axum Handler 间共享。
#[async_trait]
pub trait SnmpPort: Send + Sync {
    /// # Summary
    /// GET 单个 OID。
    ///
    /// # Returns
    /// 代理返回的值；对象不存在、超时或代理报错均返回 `SnmpError`。
    async fn get(&self, target: &SnmpTarget, oid: &Oid) -> Result<SnmpValue, SnmpError>;

    /// # Summary
    /// GETNEXT，返回字典序上紧随 `oid` 之后的变量。
    async fn get_next(&self, target: &SnmpTarget, oid: &Oid) -> Result<VarBind, SnmpError>;
}
