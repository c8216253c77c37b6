use chrono::{DateTime, Utc};
use ictdash_core::snmp::entity::WalkEntry;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// system 组信息。sysDescr 必须可读，其余字段缺失时不输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeviceInfo {
    pub host: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uptime_days: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Cisco CPU 平均负载 (%)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CpuUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_5sec: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_1min: Option<i64>,
    pub timestamp: DateTime<Utc>,
}

/// Cisco 处理器内存池 (字节)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MemoryUsage {
    pub memory_used: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_free: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_percent: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// 单个接口的计数器与运行状态
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InterfaceStats {
    pub interface_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_in: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_out: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// 一次汇总轮询，未成功的分组不输出
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AllMetrics {
    pub host: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_info: Option<DeviceInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<CpuUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface: Option<InterfaceStats>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WalkResult {
    pub host: String,
    pub oid: String,
    pub results: Vec<WalkEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DiscoveredDevice {
    pub ip: String,
    pub hostname: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Discovery {
    pub network: String,
    pub discovered_devices: Vec<DiscoveredDevice>,
    pub count: usize,
}
