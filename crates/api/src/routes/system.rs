//! # 系统路由
//!
//! 健康检查与接口索引。

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::server::AppState;
use crate::types::HealthResponse;

/// 健康检查
#[utoipa::path(
    get,
    path = "/health",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "服务存活", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        api_version: state.config.server.api_version.clone(),
        timestamp: state.clock.now(),
        environment: state.config.server.environment.clone(),
    })
}

/// 接口索引
///
/// 列出主要资源路径与示例请求，同时挂载在 `/api`。
#[utoipa::path(
    get,
    path = "/api/v1",
    tag = "系统 (System)",
    responses(
        (status = 200, description = "接口索引 (JSON 对象)")
    )
)]
pub async fn api_index(State(state): State<AppState>) -> Json<Value> {
    let prefix = state.config.api_prefix();
    let p = prefix.as_str();

    let mut endpoints = json!({
        "offices": {
            "list_all": format!("{p}/offices"),
            "get_one": format!("{p}/offices/{{id}}"),
            "devices": format!("{p}/offices/{{id}}/devices")
        },
        "devices": {
            "list_all": format!("{p}/devices"),
            "get_one": format!("{p}/devices/{{id}}"),
            "metrics": format!("{p}/devices/{{id}}/metrics"),
            "status": format!("{p}/devices/{{id}}/status"),
            "alerts": format!("{p}/devices/{{id}}/alerts")
        },
        "analytics": {
            "summary": format!("{p}/analytics/summary"),
            "region": format!("{p}/analytics/region/{{region}}"),
            "alerts": format!("{p}/analytics/alerts"),
            "trends": format!("{p}/analytics/trends"),
            "health": format!("{p}/analytics/health-score"),
            "reports": format!("{p}/analytics/reports")
        },
        "external": {
            "weather": format!("{p}/external/weather/{{office_id}}"),
            "time": format!("{p}/external/time/{{office_id}}"),
            "country": format!("{p}/external/country/{{country_code}}"),
            "news": format!("{p}/external/news")
        }
    });
    if state.config.snmp.enabled {
        endpoints["snmp"] = json!({
            "device_info": format!("{p}/snmp/device/{{host}}/info"),
            "cpu": format!("{p}/snmp/device/{{host}}/cpu"),
            "memory": format!("{p}/snmp/device/{{host}}/memory"),
            "interface": format!("{p}/snmp/device/{{host}}/interface/{{index}}"),
            "all_metrics": format!("{p}/snmp/device/{{host}}/metrics")
        });
    }

    Json(json!({
        "message": "ICT Infrastructure Dashboard API",
        "version": state.config.server.api_version,
        "documentation": "/swagger-ui",
        "base_url": prefix,
        "endpoints": endpoints,
        "examples": [
            format!("GET {p}/analytics/summary"),
            format!("GET {p}/offices"),
            format!("GET {p}/devices?status=online"),
            format!("GET {p}/analytics/alerts?severity=critical")
        ]
    }))
}
