use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// SNMP 代理默认端口
pub const DEFAULT_SNMP_PORT: u16 = 161;
/// 默认只读团体名
pub const DEFAULT_COMMUNITY: &str = "public";

/// # Summary
/// 一次轮询的目标代理。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnmpTarget {
    // 主机名或 IP
    pub host: String,
    // UDP 端口
    pub port: u16,
    // v2c 团体名
    pub community: String,
}

impl SnmpTarget {
    pub fn new(host: impl Into<String>, community: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            community: community.into(),
        }
    }
}

/// # Summary
/// 对象标识符 (OID)，以数字分量序列表示。
///
/// # Invariants
/// - 至少包含两个分量。
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(Vec<u32>);

impl Oid {
    /// 由分量切片构造
    pub fn from_slice(parts: &[u32]) -> Self {
        Self(parts.to_vec())
    }

    /// 数字分量
    pub fn parts(&self) -> &[u32] {
        &self.0
    }

    /// 追加一个分量 (例如接口索引)
    pub fn child(&self, index: u32) -> Self {
        let mut parts = self.0.clone();
        parts.push(index);
        Self(parts)
    }

    /// 是否位于 `prefix` 子树之下 (不含 `prefix` 本身)
    pub fn is_under(&self, prefix: &Oid) -> bool {
        self.0.len() > prefix.0.len() && self.0.starts_with(&prefix.0)
    }
}

impl FromStr for Oid {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('.');
        let parts = trimmed
            .split('.')
            .map(|p| p.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| format!("Invalid OID: {}", s))?;
        if parts.len() < 2 {
            return Err(format!("Invalid OID: {}", s));
        }
        Ok(Self(parts))
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", part)?;
            first = false;
        }
        Ok(())
    }
}

/// # Summary
/// SNMP 变量值，覆盖 SMIv2 的常见应用类型。
#[derive(Debug, Clone, PartialEq)]
pub enum SnmpValue {
    Integer(i64),
    OctetString(String),
    ObjectId(Oid),
    IpAddress([u8; 4]),
    Counter32(u32),
    Unsigned32(u32),
    TimeTicks(u32),
    Counter64(u64),
    Opaque(Vec<u8>),
    Null,
}

impl SnmpValue {
    /// 数值类型转为 i64，非数值返回 `None`
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            SnmpValue::Integer(v) => Some(*v),
            SnmpValue::Counter32(v) | SnmpValue::Unsigned32(v) | SnmpValue::TimeTicks(v) => {
                Some(i64::from(*v))
            }
            SnmpValue::Counter64(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// 非负数值转为 u64
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            SnmpValue::Counter64(v) => Some(*v),
            other => other.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }
}

impl fmt::Display for SnmpValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnmpValue::Integer(v) => write!(f, "{}", v),
            SnmpValue::OctetString(s) => write!(f, "{}", s),
            SnmpValue::ObjectId(oid) => write!(f, "{}", oid),
            SnmpValue::IpAddress([a, b, c, d]) => write!(f, "{}.{}.{}.{}", a, b, c, d),
            SnmpValue::Counter32(v) | SnmpValue::Unsigned32(v) | SnmpValue::TimeTicks(v) => {
                write!(f, "{}", v)
            }
            SnmpValue::Counter64(v) => write!(f, "{}", v),
            SnmpValue::Opaque(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
            SnmpValue::Null => write!(f, ""),
        }
    }
}

/// 一条变量绑定
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    pub oid: Oid,
    pub value: SnmpValue,
}

/// walk 结果行，值统一渲染为字符串
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WalkEntry {
    #[schema(example = "1.3.6.1.2.1.1.1.0")]
    pub oid: String,
    pub value: String,
}

impl From<VarBind> for WalkEntry {
    fn from(vb: VarBind) -> Self {
        Self {
            oid: vb.oid.to_string(),
            value: vb.value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oid_parse_and_display() {
        let oid: Oid = ".1.3.6.1.2.1.1.1.0".parse().unwrap();
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
        assert!("1".parse::<Oid>().is_err());
        assert!("1.3.x".parse::<Oid>().is_err());
    }

    #[test]
    fn test_oid_subtree() {
        let root: Oid = "1.3.6.1.2.1.1".parse().unwrap();
        let leaf: Oid = "1.3.6.1.2.1.1.5.0".parse().unwrap();
        let sibling: Oid = "1.3.6.1.2.1.2.1.0".parse().unwrap();
        assert!(leaf.is_under(&root));
        assert!(!sibling.is_under(&root));
        assert!(!root.is_under(&root));
        assert_eq!(root.child(7).to_string(), "1.3.6.1.2.1.1.7");
    }

    #[test]
    fn test_value_numeric_views() {
        assert_eq!(SnmpValue::TimeTicks(4200).as_i64(), Some(4200));
        assert_eq!(SnmpValue::Integer(-1).as_u64(), None);
        assert_eq!(SnmpValue::OctetString("x".into()).as_i64(), None);
        assert_eq!(SnmpValue::IpAddress([10, 0, 0, 1]).to_string(), "10.0.0.1");
    }
}
