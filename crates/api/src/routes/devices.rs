//! # 设备路由控制器
//!
//! 实现 `/api/v1/devices` 路径下的 REST 接口。指标、健康状态与告警均为模拟数据。

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::parse_param;
use crate::server::AppState;
use crate::types::{
    DeviceAlertsResponse, DeviceDetailResponse, DeviceListResponse, DeviceMetricsResponse,
    DeviceResponse, DeviceStatusResponse,
};
use ictdash_core::inventory::entity::Device;
use ictdash_telemetry::simulator::MetricsSimulator;

const DEFAULT_HISTORY_HOURS: u32 = 24;
const MAX_HISTORY_HOURS: u32 = 168;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct DeviceFilter {
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub status: Option<String>,
    pub office_id: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct HistoryQuery {
    pub hours: Option<String>,
}

async fn load_device(state: &AppState, id: &str) -> Result<Device, ApiError> {
    let inventory = state.inventory.load().await?;
    inventory
        .device(id)
        .cloned()
        .ok_or_else(|| ApiError::not_found("Device not found"))
}

/// 列出设备
#[utoipa::path(
    get,
    path = "/api/v1/devices",
    tag = "设备 (Devices)",
    params(
        ("type" = Option<String>, Query, description = "设备类型，如 router"),
        ("status" = Option<String>, Query, description = "online / offline / warning"),
        ("office_id" = Option<String>, Query, description = "所属办公室 ID")
    ),
    responses(
        (status = 200, description = "设备列表", body = DeviceListResponse)
    )
)]
pub async fn list_devices(
    State(state): State<AppState>,
    Query(filter): Query<DeviceFilter>,
) -> Result<Json<DeviceListResponse>, ApiError> {
    let inventory = state.inventory.load().await?;
    let devices: Vec<DeviceResponse> = inventory
        .devices
        .iter()
        .filter(|d| filter.device_type.as_deref().is_none_or(|t| d.device_type == t))
        .filter(|d| filter.status.as_deref().is_none_or(|s| d.status.to_string() == s))
        .filter(|d| filter.office_id.as_deref().is_none_or(|o| d.office_id == o))
        .map(DeviceResponse::from)
        .collect();

    Ok(Json(DeviceListResponse {
        total: devices.len(),
        devices,
    }))
}

/// 获取设备详情与当前指标
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}",
    tag = "设备 (Devices)",
    params(
        ("id" = String, Path, description = "设备 ID")
    ),
    responses(
        (status = 200, description = "设备详情", body = DeviceDetailResponse),
        (status = 404, description = "设备不存在")
    )
)]
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeviceDetailResponse>, ApiError> {
    let device = load_device(&state, &id).await?;
    Ok(Json(DeviceDetailResponse {
        device: DeviceResponse::from(&device),
        current_metrics: state.simulator.current_metrics(),
    }))
}

/// 获取设备指标历史
///
/// 每小时一个采样点，最旧的在前。
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}/metrics",
    tag = "设备 (Devices)",
    params(
        ("id" = String, Path, description = "设备 ID"),
        ("hours" = Option<u32>, Query, description = "小时数，1~168，默认 24")
    ),
    responses(
        (status = 200, description = "指标历史", body = DeviceMetricsResponse),
        (status = 400, description = "hours 非法"),
        (status = 404, description = "设备不存在")
    )
)]
pub async fn get_device_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<DeviceMetricsResponse>, ApiError> {
    let device = load_device(&state, &id).await?;
    let hours: i64 = parse_param(
        query.hours.as_deref(),
        i64::from(DEFAULT_HISTORY_HOURS),
        "Invalid hours parameter - must be a number",
    )?;
    let hours = u32::try_from(hours)
        .ok()
        .filter(|h| (1..=MAX_HISTORY_HOURS).contains(h))
        .ok_or_else(|| {
            ApiError::bad_request(format!("Hours must be between 1 and {}", MAX_HISTORY_HOURS))
        })?;

    let metrics = state.simulator.metrics_history(hours);
    Ok(Json(DeviceMetricsResponse {
        device_id: id,
        device_name: device.name,
        period: format!("{} hours", hours),
        data_points: metrics.len(),
        metrics,
    }))
}

/// 评估设备健康状态
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}/status",
    tag = "设备 (Devices)",
    params(
        ("id" = String, Path, description = "设备 ID")
    ),
    responses(
        (status = 200, description = "健康评估", body = DeviceStatusResponse),
        (status = 404, description = "设备不存在")
    )
)]
pub async fn get_device_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeviceStatusResponse>, ApiError> {
    let device = load_device(&state, &id).await?;
    let metrics = state.simulator.current_metrics();
    let evaluation = MetricsSimulator::evaluate(&metrics);

    Ok(Json(DeviceStatusResponse {
        device_id: id,
        device_name: device.name,
        status: device.status,
        health_status: evaluation.health_status,
        warnings: evaluation.warnings,
        metrics,
        last_updated: state.clock.now(),
    }))
}

/// 设备告警历史
#[utoipa::path(
    get,
    path = "/api/v1/devices/{id}/alerts",
    tag = "设备 (Devices)",
    params(
        ("id" = String, Path, description = "设备 ID")
    ),
    responses(
        (status = 200, description = "告警历史，最新在前", body = DeviceAlertsResponse),
        (status = 404, description = "设备不存在")
    )
)]
pub async fn get_device_alerts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeviceAlertsResponse>, ApiError> {
    let device = load_device(&state, &id).await?;
    let alerts = state.simulator.device_alerts(&device);
    Ok(Json(DeviceAlertsResponse {
        device_id: id,
        total_alerts: alerts.len(),
        alerts,
    }))
}
