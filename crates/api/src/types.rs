//! # DTO (Data Transfer Object) 层
//!
//! 将内部领域模型转化为面向前端 JSON 输出的轻量结构体。
//! 所有 DTO 必须派生 `utoipa::ToSchema` 以自动进入 Swagger 文档。

use chrono::{DateTime, Utc};
use ictdash_core::external::entity::{ForecastDay, NewsArticle, Weather};
use ictdash_core::inventory::entity::{Device, DeviceStatus, Office};
use ictdash_core::store::port::Report;
use ictdash_core::telemetry::entity::{DeviceAlert, DeviceMetrics, HealthStatus};
use ictdash_telemetry::model::Performer;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================
//  系统
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "v1")]
    pub api_version: String,
    pub timestamp: DateTime<Utc>,
    #[schema(example = "development")]
    pub environment: String,
}

// ============================================================
//  办公室
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// 办公室 DTO，坐标收拢为 `coordinates`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeResponse {
    #[schema(example = "CO-AF-KEN")]
    pub id: String,
    #[schema(example = "UNDP Kenya")]
    pub name: String,
    pub country: String,
    #[schema(example = "Africa")]
    pub region: String,
    pub city: String,
    pub coordinates: Coordinates,
    #[schema(example = "Africa/Nairobi")]
    pub timezone: String,
    #[schema(example = "active")]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeListResponse {
    pub total: usize,
    pub offices: Vec<OfficeResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeDevicesResponse {
    pub office_id: String,
    pub office_name: String,
    pub total_devices: usize,
    pub devices: Vec<DeviceResponse>,
}

/// 新建办公室请求。字段均可缺省，由处理器校验必填项。
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateOfficeRequest {
    pub name: Option<String>,
    pub country: Option<String>,
    #[schema(example = "Asia-Pacific")]
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateOfficeResponse {
    pub message: String,
    pub office: OfficeResponse,
}

// ============================================================
//  设备
// ============================================================

/// 设备 DTO，`device_type` 以 `type` 输出
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceResponse {
    #[schema(example = "DEV-001")]
    pub id: String,
    pub office_id: String,
    pub name: String,
    #[serde(rename = "type")]
    #[schema(example = "router")]
    pub device_type: String,
    #[schema(example = "10.10.0.1")]
    pub ip_address: String,
    pub status: DeviceStatus,
    pub last_seen: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceListResponse {
    pub total: usize,
    pub devices: Vec<DeviceResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceDetailResponse {
    #[serde(flatten)]
    pub device: DeviceResponse,
    pub current_metrics: DeviceMetrics,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceMetricsResponse {
    pub device_id: String,
    pub device_name: String,
    #[schema(example = "24 hours")]
    pub period: String,
    pub data_points: usize,
    pub metrics: Vec<DeviceMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceStatusResponse {
    pub device_id: String,
    pub device_name: String,
    pub status: DeviceStatus,
    pub health_status: HealthStatus,
    pub warnings: Vec<String>,
    pub metrics: DeviceMetrics,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviceAlertsResponse {
    pub device_id: String,
    pub total_alerts: usize,
    pub alerts: Vec<DeviceAlert>,
}

// ============================================================
//  分析与报告
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TopPerformersResponse {
    pub total: usize,
    pub limit: usize,
    pub performers: Vec<Performer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportCreatedResponse {
    pub message: String,
    #[schema(example = "RPT-20260301120000")]
    pub report_id: String,
    pub download_url: String,
    pub generated_at: String,
}

/// 报告列表中的一行
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub generated_at: String,
    pub generated_by: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportListResponse {
    pub total: usize,
    pub reports: Vec<ReportEntry>,
}

// ============================================================
//  外部数据
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeLocation {
    pub city: String,
    pub country: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeWeatherResponse {
    pub office_id: String,
    pub office_name: String,
    pub location: OfficeLocation,
    pub weather: Weather,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeForecastResponse {
    pub office_id: String,
    pub office_name: String,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeTimeResponse {
    pub office_id: String,
    pub office_name: String,
    pub local_time: String,
    pub timezone: String,
    pub utc_offset: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TimezoneListResponse {
    pub total: usize,
    pub timezones: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfficeRef {
    pub id: String,
    pub name: String,
    pub city: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DistanceResponse {
    pub office1: OfficeRef,
    pub office2: OfficeRef,
    pub distance_km: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewsResponse {
    pub news: Vec<NewsArticle>,
}

// ============================================================
//  SNMP
// ============================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DiscoverRequest {
    #[schema(example = "192.168.1.0/24")]
    pub network: Option<String>,
    #[schema(example = "public")]
    pub community: Option<String>,
}

// ============================================================
//  领域模型 → DTO 惯用转换 (impl From<T>)
// ============================================================

impl From<&Office> for OfficeResponse {
    fn from(o: &Office) -> Self {
        Self {
            id: o.id.clone(),
            name: o.name.clone(),
            country: o.country.clone(),
            region: o.region.clone(),
            city: o.city.clone(),
            coordinates: Coordinates {
                lat: o.latitude,
                lng: o.longitude,
            },
            timezone: o.timezone.clone(),
            status: o.status.clone(),
        }
    }
}

impl From<&Office> for OfficeRef {
    fn from(o: &Office) -> Self {
        Self {
            id: o.id.clone(),
            name: o.name.clone(),
            city: o.city.clone(),
        }
    }
}

impl From<&Office> for OfficeLocation {
    fn from(o: &Office) -> Self {
        Self {
            city: o.city.clone(),
            country: o.country.clone(),
            coordinates: Coordinates {
                lat: o.latitude,
                lng: o.longitude,
            },
        }
    }
}

impl From<&Device> for DeviceResponse {
    fn from(d: &Device) -> Self {
        Self {
            id: d.id.clone(),
            office_id: d.office_id.clone(),
            name: d.name.clone(),
            device_type: d.device_type.clone(),
            ip_address: d.ip_address.clone(),
            status: d.status,
            last_seen: d.last_seen,
        }
    }
}

impl From<&Report> for ReportEntry {
    fn from(r: &Report) -> Self {
        Self {
            id: r.id.clone(),
            kind: r.kind.clone(),
            generated_at: r.generated_at.clone(),
            generated_by: r.generated_by.clone(),
            url: format!("/api/v1/analytics/reports/{}", r.id),
        }
    }
}
