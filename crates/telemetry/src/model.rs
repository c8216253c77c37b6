//! 分析接口的输出结构。

use chrono::{DateTime, Utc};
use ictdash_core::telemetry::entity::Severity;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 全局概览
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GlobalSummary {
    pub timestamp: DateTime<Utc>,
    pub global_health: GlobalHealth,
    pub performance_metrics: PerformanceMetrics,
    pub alerts: AlertCounts,
    /// 按办公室首次出现的顺序排列
    pub regional_breakdown: Vec<RegionBreakdown>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GlobalHealth {
    pub total_offices: usize,
    pub active_offices: usize,
    /// 在运营办公室占比 (%)
    pub office_health: f64,
    pub total_devices: usize,
    pub online_devices: usize,
    /// 在线设备占比 (%)
    pub device_health: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PerformanceMetrics {
    pub average_uptime_pct: f64,
    pub average_response_time_ms: f64,
    pub average_cpu_usage_pct: f64,
    pub average_memory_usage_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertCounts {
    pub critical: u32,
    pub warning: u32,
    pub info: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionBreakdown {
    pub region: String,
    pub offices: usize,
    pub devices: usize,
    pub health_score: f64,
}

/// 单个大区的统计
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionAnalytics {
    #[schema(example = "Africa")]
    pub region: String,
    pub summary: RegionSummary,
    pub performance: RegionPerformance,
    pub offices: Vec<RegionOffice>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionSummary {
    pub total_offices: usize,
    pub total_devices: usize,
    pub online_devices: usize,
    pub avg_devices_per_office: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionPerformance {
    pub average_uptime_pct: f64,
    pub average_latency_ms: f64,
    pub packet_loss_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegionOffice {
    pub id: String,
    pub name: String,
    pub country: String,
    pub city: String,
    pub status: String,
    pub health_score: f64,
    pub devices_count: usize,
}

/// 全局告警列表
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertFeed {
    pub total: usize,
    pub severity_filter: Option<Severity>,
    pub critical_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Alert {
    #[schema(example = "ALERT-00001")]
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: String,
    pub device_id: String,
    pub device_name: String,
    pub office_id: String,
    pub office_name: String,
    pub country: String,
    pub message: String,
    pub acknowledged: bool,
    pub resolved: bool,
}

/// 性能趋势
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PerformanceTrends {
    pub period_days: u32,
    pub data_points: usize,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub trends: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub avg_cpu_usage: f64,
    pub avg_memory_usage: f64,
    pub avg_bandwidth_mbps: f64,
    pub avg_latency_ms: f64,
    pub packet_loss_pct: f64,
    pub devices_online: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Performer {
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    pub office_name: String,
    pub country: String,
    pub region: String,
    pub uptime_pct: f64,
    pub avg_response_time_ms: f64,
    pub reliability_score: f64,
    /// `(uptime_pct + reliability_score) / 2`
    pub combined_score: f64,
}

/// 设备类型分布
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceDistribution {
    pub total_devices: usize,
    pub types_count: usize,
    pub distribution: Vec<TypeShare>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TypeShare {
    /// 首字母大写的设备类型，如 `Router`
    #[serde(rename = "type")]
    pub kind: String,
    pub count: usize,
    pub percentage: f64,
}

/// 健康评分与建议
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthScore {
    pub health_score: f64,
    /// excellent / good / fair / poor
    pub status: String,
    pub status_color: String,
    pub status_icon: String,
    pub components: HealthComponents,
    pub recommendations: Vec<Recommendation>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthComponents {
    pub device_health: f64,
    pub office_health: f64,
    pub avg_uptime: f64,
}

/// 建议优先级，声明顺序即排序顺序
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: String,
    pub icon: String,
    pub message: String,
    pub action: String,
}
