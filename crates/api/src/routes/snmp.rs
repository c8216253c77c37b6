//! # SNMP 路由控制器
//!
//! 实现 `/api/v1/snmp` 路径下的设备轮询接口，仅在 `snmp.enabled` 时挂载。
//! 轮询失败的具体原因 (不可达、团体名错误、OID 不支持) 只记录在日志中，
//! 客户端统一收到 404 与通用说明。

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::{parse_body, parse_param};
use crate::server::AppState;
use crate::types::DiscoverRequest;
use ictdash_core::snmp::entity::{Oid, SnmpTarget};
use ictdash_snmp::model::{
    AllMetrics, CpuUsage, DeviceInfo, Discovery, InterfaceStats, MemoryUsage, WalkResult,
};
use ictdash_snmp::oid::SYSTEM_SUBTREE;
use ictdash_snmp::service::DEFAULT_WALK_RESULTS;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct TargetQuery {
    pub community: Option<String>,
    pub port: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct WalkQuery {
    pub oid: Option<String>,
    pub community: Option<String>,
    pub port: Option<String>,
    pub max_results: Option<String>,
}

/// 由路径中的主机与查询参数组装轮询目标，缺省值取自配置
fn target(
    state: &AppState,
    host: &str,
    community: Option<String>,
    port: Option<&str>,
) -> Result<SnmpTarget, ApiError> {
    let community = community
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| state.config.snmp.default_community.clone());
    let port = parse_param(
        port,
        state.config.snmp.default_port,
        "Invalid port parameter - must be a number",
    )?;
    Ok(SnmpTarget::new(host, community, port))
}

/// 设备 system 组信息
#[utoipa::path(
    get,
    path = "/api/v1/snmp/device/{host}/info",
    tag = "SNMP",
    params(
        ("host" = String, Path, description = "设备主机名或 IP"),
        ("community" = Option<String>, Query, description = "团体名，默认 public"),
        ("port" = Option<u16>, Query, description = "UDP 端口，默认 161")
    ),
    responses(
        (status = 200, description = "设备信息", body = DeviceInfo),
        (status = 404, description = "设备无应答")
    )
)]
pub async fn get_device_info(
    State(state): State<AppState>,
    Path(host): Path<String>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<DeviceInfo>, ApiError> {
    let target = target(&state, &host, query.community, query.port.as_deref())?;
    state.snmp.device_info(&target).await.map(Json).ok_or_else(|| {
        ApiError::not_found("Unable to connect to device").with("host", host)
    })
}

/// Cisco CPU 负载
#[utoipa::path(
    get,
    path = "/api/v1/snmp/device/{host}/cpu",
    tag = "SNMP",
    params(
        ("host" = String, Path, description = "设备主机名或 IP"),
        ("community" = Option<String>, Query, description = "团体名，默认 public"),
        ("port" = Option<u16>, Query, description = "UDP 端口，默认 161")
    ),
    responses(
        (status = 200, description = "CPU 负载", body = CpuUsage),
        (status = 404, description = "无 CPU 数据")
    )
)]
pub async fn get_cpu(
    State(state): State<AppState>,
    Path(host): Path<String>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<CpuUsage>, ApiError> {
    let target = target(&state, &host, query.community, query.port.as_deref())?;
    state.snmp.cpu_usage(&target).await.map(Json).ok_or_else(|| {
        ApiError::not_found("Unable to retrieve CPU data")
            .with("host", host)
            .with(
                "note",
                "This may not be a Cisco device, or SNMP is not configured",
            )
    })
}

/// Cisco 内存池
#[utoipa::path(
    get,
    path = "/api/v1/snmp/device/{host}/memory",
    tag = "SNMP",
    params(
        ("host" = String, Path, description = "设备主机名或 IP"),
        ("community" = Option<String>, Query, description = "团体名，默认 public"),
        ("port" = Option<u16>, Query, description = "UDP 端口，默认 161")
    ),
    responses(
        (status = 200, description = "内存使用", body = MemoryUsage),
        (status = 404, description = "无内存数据")
    )
)]
pub async fn get_memory(
    State(state): State<AppState>,
    Path(host): Path<String>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<MemoryUsage>, ApiError> {
    let target = target(&state, &host, query.community, query.port.as_deref())?;
    state.snmp.memory_usage(&target).await.map(Json).ok_or_else(|| {
        ApiError::not_found("Unable to retrieve memory data").with("host", host)
    })
}

/// 接口计数器与状态
#[utoipa::path(
    get,
    path = "/api/v1/snmp/device/{host}/interface/{index}",
    tag = "SNMP",
    params(
        ("host" = String, Path, description = "设备主机名或 IP"),
        ("index" = u32, Path, description = "ifIndex"),
        ("community" = Option<String>, Query, description = "团体名，默认 public"),
        ("port" = Option<u16>, Query, description = "UDP 端口，默认 161")
    ),
    responses(
        (status = 200, description = "接口统计", body = InterfaceStats),
        (status = 400, description = "接口索引非法"),
        (status = 404, description = "无接口数据")
    )
)]
pub async fn get_interface(
    State(state): State<AppState>,
    Path((host, index)): Path<(String, String)>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<InterfaceStats>, ApiError> {
    let index: u32 = index
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid interface index"))?;
    let target = target(&state, &host, query.community, query.port.as_deref())?;
    state
        .snmp
        .interface_stats(&target, index)
        .await
        .map(Json)
        .ok_or_else(|| {
            ApiError::not_found("Unable to retrieve interface data")
                .with("host", host)
                .with("interface_index", index)
        })
}

/// 汇总轮询
///
/// 依次读取 system 组、CPU、内存与接口 1，只返回成功的分组。
#[utoipa::path(
    get,
    path = "/api/v1/snmp/device/{host}/metrics",
    tag = "SNMP",
    params(
        ("host" = String, Path, description = "设备主机名或 IP"),
        ("community" = Option<String>, Query, description = "团体名，默认 public"),
        ("port" = Option<u16>, Query, description = "UDP 端口，默认 161")
    ),
    responses(
        (status = 200, description = "汇总结果", body = AllMetrics)
    )
)]
pub async fn get_metrics(
    State(state): State<AppState>,
    Path(host): Path<String>,
    Query(query): Query<TargetQuery>,
) -> Result<Json<AllMetrics>, ApiError> {
    let target = target(&state, &host, query.community, query.port.as_deref())?;
    Ok(Json(state.snmp.all_metrics(&target).await))
}

/// 子树遍历
#[utoipa::path(
    get,
    path = "/api/v1/snmp/device/{host}/walk",
    tag = "SNMP",
    params(
        ("host" = String, Path, description = "设备主机名或 IP"),
        ("oid" = Option<String>, Query, description = "起始 OID，默认 1.3.6.1.2.1.1"),
        ("max_results" = Option<usize>, Query, description = "最多返回行数，默认 10，上限 100"),
        ("community" = Option<String>, Query, description = "团体名，默认 public"),
        ("port" = Option<u16>, Query, description = "UDP 端口，默认 161")
    ),
    responses(
        (status = 200, description = "遍历结果", body = WalkResult),
        (status = 400, description = "OID 或数量非法"),
        (status = 404, description = "无结果")
    )
)]
pub async fn walk(
    State(state): State<AppState>,
    Path(host): Path<String>,
    Query(query): Query<WalkQuery>,
) -> Result<Json<WalkResult>, ApiError> {
    let oid_text = query
        .oid
        .filter(|o| !o.trim().is_empty())
        .unwrap_or_else(|| SYSTEM_SUBTREE.to_string());
    let root: Oid = oid_text
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid OID").with("oid", oid_text.clone()))?;
    let max_results = parse_param(
        query.max_results.as_deref(),
        DEFAULT_WALK_RESULTS,
        "Invalid max_results parameter - must be a positive integer",
    )?;
    let target = target(&state, &host, query.community, query.port.as_deref())?;

    let Some(results) = state.snmp.walk(&target, &root, max_results).await else {
        return Err(ApiError::not_found("SNMP walk failed")
            .with("host", host)
            .with("oid", oid_text));
    };
    Ok(Json(WalkResult {
        host,
        oid: oid_text,
        count: results.len(),
        results,
    }))
}

/// 网段探测
///
/// 仅探测网段的 `.1` 与 `.254`。
#[utoipa::path(
    post,
    path = "/api/v1/snmp/discover",
    tag = "SNMP",
    request_body = DiscoverRequest,
    responses(
        (status = 200, description = "发现结果", body = Discovery),
        (status = 400, description = "network 缺失或非法")
    )
)]
pub async fn discover(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Discovery>, ApiError> {
    let req: DiscoverRequest = parse_body(&body)?;
    let Some(network) = req.network.filter(|n| !n.trim().is_empty()) else {
        return Err(ApiError::bad_request("network parameter required"));
    };
    let community = req
        .community
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| state.config.snmp.default_community.clone());

    state
        .snmp
        .discover(&network, &community, state.config.snmp.default_port)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::bad_request("Invalid network parameter").with("network", network))
}
