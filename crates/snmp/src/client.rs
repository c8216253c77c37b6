use async_trait::async_trait;
use ictdash_core::snmp::entity::{Oid, SnmpTarget, SnmpValue, VarBind};
use ictdash_core::snmp::error::SnmpError;
use ictdash_core::snmp::port::SnmpPort;
use snmp::{SyncSession, Value};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

/// # Summary
/// 基于 UDP 的 SNMP v2c 客户端。
///
/// # Invariants
/// - 每次调用新建一个会话 (独立的 UDP 套接字)，调用结束即丢弃。
/// - 不重试：超时直接返回 `SnmpError::Transport`。
/// - 同步 I/O 放到 tokio 阻塞线程池执行，不占用异步工作线程。
pub struct UdpSnmpClient {
    timeout: Duration,
}

impl UdpSnmpClient {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl SnmpPort for UdpSnmpClient {
    async fn get(&self, target: &SnmpTarget, oid: &Oid) -> Result<SnmpValue, SnmpError> {
        let target = target.clone();
        let oid = oid.clone();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || blocking_get(&target, &oid, timeout))
            .await
            .map_err(|e| SnmpError::Transport(e.to_string()))?
    }

    async fn get_next(&self, target: &SnmpTarget, oid: &Oid) -> Result<VarBind, SnmpError> {
        let target = target.clone();
        let oid = oid.clone();
        let timeout = self.timeout;
        tokio::task::spawn_blocking(move || blocking_get_next(&target, &oid, timeout))
            .await
            .map_err(|e| SnmpError::Transport(e.to_string()))?
    }
}

fn resolve(target: &SnmpTarget) -> Result<SocketAddr, SnmpError> {
    (target.host.as_str(), target.port)
        .to_socket_addrs()
        .map_err(|e| SnmpError::Resolve(format!("{}: {}", target.host, e)))?
        .next()
        .ok_or_else(|| SnmpError::Resolve(target.host.clone()))
}

fn open_session(target: &SnmpTarget, timeout: Duration) -> Result<SyncSession, SnmpError> {
    let addr = resolve(target)?;
    SyncSession::new(addr, target.community.as_bytes(), Some(timeout), 0)
        .map_err(|e| SnmpError::Transport(format!("{}: {}", addr, e)))
}

fn blocking_get(target: &SnmpTarget, oid: &Oid, timeout: Duration) -> Result<SnmpValue, SnmpError> {
    let mut session = open_session(target, timeout)?;
    let pdu = session
        .get(oid.parts())
        .map_err(|e| SnmpError::Transport(format!("{:?}", e)))?;
    if pdu.error_status != 0 {
        return Err(SnmpError::Agent(pdu.error_status));
    }
    // 协议库无法解析 v2c 异常值 (noSuchObject / noSuchInstance)，此时变量列表为空
    let mut varbinds = pdu.varbinds;
    let (_, value) = varbinds
        .next()
        .ok_or_else(|| SnmpError::NoSuchObject(oid.to_string()))?;
    convert_value(oid, value)
}

fn blocking_get_next(
    target: &SnmpTarget,
    oid: &Oid,
    timeout: Duration,
) -> Result<VarBind, SnmpError> {
    let mut session = open_session(target, timeout)?;
    let pdu = session
        .getnext(oid.parts())
        .map_err(|e| SnmpError::Transport(format!("{:?}", e)))?;
    if pdu.error_status != 0 {
        return Err(SnmpError::Agent(pdu.error_status));
    }
    // endOfMibView 同样表现为空的变量列表
    let mut varbinds = pdu.varbinds;
    let (name, value) = varbinds.next().ok_or(SnmpError::EndOfMib)?;

    let mut buf: snmp::ObjIdBuf = [0; 128];
    let parts = name.read_name(&mut buf).map_err(|e| {
        tracing::debug!("Unreadable OID after {}: {:?}", oid, e);
        SnmpError::EndOfMib
    })?;
    let next_oid = Oid::from_slice(parts);
    let value = convert_value(&next_oid, value)?;
    Ok(VarBind {
        oid: next_oid,
        value,
    })
}

/// # Summary
/// 把协议库的借用值转换为自有的 `SnmpValue`。
///
/// # Logic
/// - 构造类型、布尔值等不会出现在响应变量中的值视为解码错误。
/// - v2c 异常值在此之前已被协议库丢弃，由调用方按空变量列表处理。
fn convert_value(oid: &Oid, value: Value<'_>) -> Result<SnmpValue, SnmpError> {
    match value {
        Value::Integer(v) => Ok(SnmpValue::Integer(v)),
        Value::OctetString(bytes) => Ok(SnmpValue::OctetString(
            String::from_utf8_lossy(bytes).into_owned(),
        )),
        Value::ObjectIdentifier(name) => {
            let mut buf: snmp::ObjIdBuf = [0; 128];
            let parts = name
                .read_name(&mut buf)
                .map_err(|e| SnmpError::Decode(format!("{:?}", e)))?;
            Ok(SnmpValue::ObjectId(Oid::from_slice(parts)))
        }
        Value::IpAddress(octets) => Ok(SnmpValue::IpAddress(octets)),
        Value::Counter32(v) => Ok(SnmpValue::Counter32(v)),
        Value::Unsigned32(v) => Ok(SnmpValue::Unsigned32(v)),
        Value::Timeticks(v) => Ok(SnmpValue::TimeTicks(v)),
        Value::Counter64(v) => Ok(SnmpValue::Counter64(v)),
        Value::Opaque(bytes) => Ok(SnmpValue::Opaque(bytes.to_vec())),
        Value::Null => Ok(SnmpValue::Null),
        _ => Err(SnmpError::Decode(format!("unsupported value type at {}", oid))),
    }
}
