use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// # Summary
/// 设备的一次性能采样。
///
/// # Invariants
/// - 除 `temperature` (一位小数) 与 `uptime` (整秒) 外均保留两位小数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeviceMetrics {
    /// CPU 使用率 (%)
    pub cpu_usage: f64,
    /// 内存使用率 (%)
    pub memory_usage: f64,
    /// 入向带宽 (Mbps)
    pub bandwidth_in: f64,
    /// 出向带宽 (Mbps)
    pub bandwidth_out: f64,
    /// 机箱温度 (°C)
    pub temperature: f64,
    /// 运行时长 (秒)
    pub uptime: u64,
    /// 丢包率 (%)
    pub packet_loss: f64,
    /// 延迟 (ms)
    pub latency: f64,
    pub timestamp: DateTime<Utc>,
}

/// 告警级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// 全部合法取值，按严重程度降序
    pub const ALL: [Severity; 3] = [Severity::Critical, Severity::Warning, Severity::Info];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    // 大小写敏感，与查询参数的取值保持一致
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("Unknown severity: {}", s))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 设备健康状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

/// # Summary
/// 根据单次采样得出的健康评估。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthEvaluation {
    pub health_status: HealthStatus,
    /// 触发的告警描述，按检查顺序排列
    pub warnings: Vec<String>,
}

/// 单台设备的历史告警
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DeviceAlert {
    #[schema(example = "ALERT-DEV-001-1")]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    #[serde(rename = "type")]
    #[schema(example = "High CPU Usage")]
    pub kind: String,
    pub message: String,
    pub acknowledged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("info".parse::<Severity>().unwrap(), Severity::Info);
        assert!("CRITICAL".parse::<Severity>().is_err());
        assert!("urgent".parse::<Severity>().is_err());
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
    }
}
