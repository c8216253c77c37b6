//! # 分析路由控制器
//!
//! 实现 `/api/v1/analytics` 路径下的全局概览、告警、趋势、评分与报告接口。

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::{parse_body, parse_param};
use crate::server::AppState;
use crate::types::{ReportCreatedResponse, ReportEntry, ReportListResponse, TopPerformersResponse};
use ictdash_core::store::port::Report;
use ictdash_core::telemetry::entity::Severity;
use ictdash_telemetry::analytics::KNOWN_REGIONS;
use ictdash_telemetry::model::{
    AlertFeed, DeviceDistribution, GlobalSummary, HealthScore, PerformanceTrends, RegionAnalytics,
};
use ictdash_telemetry::report::ReportRequest;

const DEFAULT_ALERT_LIMIT: usize = 50;
const MAX_ALERT_LIMIT: usize = 100;
const DEFAULT_TREND_DAYS: i64 = 7;
const MAX_TREND_DAYS: i64 = 30;
const DEFAULT_PERFORMERS: i64 = 10;
const MAX_PERFORMERS: i64 = 50;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AlertQuery {
    pub severity: Option<String>,
    pub limit: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct TrendQuery {
    pub days: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LimitQuery {
    pub limit: Option<String>,
}

/// 全局概览
#[utoipa::path(
    get,
    path = "/api/v1/analytics/summary",
    tag = "分析 (Analytics)",
    responses(
        (status = 200, description = "全局概览", body = GlobalSummary)
    )
)]
pub async fn get_summary(State(state): State<AppState>) -> Result<Json<GlobalSummary>, ApiError> {
    Ok(Json(state.analytics.summary().await?))
}

/// 大区统计
#[utoipa::path(
    get,
    path = "/api/v1/analytics/region/{region}",
    tag = "分析 (Analytics)",
    params(
        ("region" = String, Path, description = "大区名称，如 Africa")
    ),
    responses(
        (status = 200, description = "大区统计", body = RegionAnalytics),
        (status = 404, description = "大区不存在或无数据，附 available_regions")
    )
)]
pub async fn get_region(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<RegionAnalytics>, ApiError> {
    match state.analytics.region(&region).await? {
        Some(analytics) => Ok(Json(analytics)),
        None => Err(ApiError::not_found("Region not found or has no data")
            .with("available_regions", KNOWN_REGIONS.to_vec())),
    }
}

/// 告警列表
///
/// 按时间倒序，`limit` 超过 100 时按 100 处理。
#[utoipa::path(
    get,
    path = "/api/v1/analytics/alerts",
    tag = "分析 (Analytics)",
    params(
        ("severity" = Option<String>, Query, description = "critical / warning / info"),
        ("limit" = Option<usize>, Query, description = "返回条数，默认 50，上限 100")
    ),
    responses(
        (status = 200, description = "告警列表", body = AlertFeed),
        (status = 400, description = "severity 或 limit 非法")
    )
)]
pub async fn get_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> Result<Json<AlertFeed>, ApiError> {
    let severity = match query.severity.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => Some(raw.parse::<Severity>().map_err(|_| {
            let valid: Vec<&str> = Severity::ALL.iter().map(|s| s.as_str()).collect();
            ApiError::bad_request("Invalid severity parameter").with("valid_values", valid)
        })?),
    };
    let limit = parse_param(
        query.limit.as_deref(),
        DEFAULT_ALERT_LIMIT,
        "Invalid limit parameter - must be a positive integer",
    )?
    .min(MAX_ALERT_LIMIT);

    Ok(Json(state.analytics.alerts(severity, limit).await?))
}

/// 性能趋势
#[utoipa::path(
    get,
    path = "/api/v1/analytics/trends",
    tag = "分析 (Analytics)",
    params(
        ("days" = Option<u32>, Query, description = "天数，1~30，默认 7")
    ),
    responses(
        (status = 200, description = "逐小时趋势", body = PerformanceTrends),
        (status = 400, description = "days 非法")
    )
)]
pub async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<PerformanceTrends>, ApiError> {
    let days = parse_param(
        query.days.as_deref(),
        DEFAULT_TREND_DAYS,
        "Invalid days parameter - must be a number",
    )?;
    if days < 1 {
        return Err(ApiError::bad_request("Days parameter must be at least 1"));
    }
    if days > MAX_TREND_DAYS {
        return Err(ApiError::bad_request("Maximum 30 days allowed"));
    }
    let days = u32::try_from(days).map_err(|_| ApiError::bad_request("Maximum 30 days allowed"))?;

    Ok(Json(state.analytics.trends(days).await?))
}

/// 表现最好的设备
///
/// `limit` 限制在 1~50。
#[utoipa::path(
    get,
    path = "/api/v1/analytics/top-performers",
    tag = "分析 (Analytics)",
    params(
        ("limit" = Option<usize>, Query, description = "返回条数，默认 10")
    ),
    responses(
        (status = 200, description = "设备排行", body = TopPerformersResponse),
        (status = 400, description = "limit 不是数字")
    )
)]
pub async fn get_top_performers(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<TopPerformersResponse>, ApiError> {
    let limit = parse_param(
        query.limit.as_deref(),
        DEFAULT_PERFORMERS,
        "Invalid limit parameter - must be a number",
    )?
    .clamp(1, MAX_PERFORMERS);
    let limit = usize::try_from(limit).unwrap_or(1);

    let performers = state.analytics.top_performers(limit).await?;
    Ok(Json(TopPerformersResponse {
        total: performers.len(),
        limit,
        performers,
    }))
}

/// 设备类型分布
#[utoipa::path(
    get,
    path = "/api/v1/analytics/device-distribution",
    tag = "分析 (Analytics)",
    responses(
        (status = 200, description = "类型分布", body = DeviceDistribution)
    )
)]
pub async fn get_device_distribution(
    State(state): State<AppState>,
) -> Result<Json<DeviceDistribution>, ApiError> {
    Ok(Json(state.analytics.distribution().await?))
}

/// 综合健康评分
#[utoipa::path(
    get,
    path = "/api/v1/analytics/health-score",
    tag = "分析 (Analytics)",
    responses(
        (status = 200, description = "健康评分与建议", body = HealthScore)
    )
)]
pub async fn get_health_score(
    State(state): State<AppState>,
) -> Result<Json<HealthScore>, ApiError> {
    Ok(Json(state.analytics.health_score().await?))
}

/// 生成报告
///
/// 请求体可省略，缺省为 summary 类型并包含趋势与告警。
#[utoipa::path(
    post,
    path = "/api/v1/analytics/reports/generate",
    tag = "分析 (Analytics)",
    request_body = ReportRequest,
    responses(
        (status = 201, description = "报告已生成", body = ReportCreatedResponse),
        (status = 400, description = "请求体不是合法 JSON")
    )
)]
pub async fn generate_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ReportCreatedResponse>), ApiError> {
    let request: ReportRequest = parse_body(&body)?;
    let report = state.reports.generate(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ReportCreatedResponse {
            message: "Report generated successfully".to_string(),
            download_url: format!("/api/v1/analytics/reports/{}", report.id),
            report_id: report.id,
            generated_at: report.generated_at,
        }),
    ))
}

/// 获取报告全文
#[utoipa::path(
    get,
    path = "/api/v1/analytics/reports/{id}",
    tag = "分析 (Analytics)",
    params(
        ("id" = String, Path, description = "报告 ID，如 RPT-20260301120000")
    ),
    responses(
        (status = 200, description = "报告", body = Report),
        (status = 404, description = "报告不存在")
    )
)]
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Report>, ApiError> {
    state
        .reports
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Report not found"))
}

/// 列出已生成的报告，最新在前
#[utoipa::path(
    get,
    path = "/api/v1/analytics/reports",
    tag = "分析 (Analytics)",
    responses(
        (status = 200, description = "报告列表", body = ReportListResponse)
    )
)]
pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let reports: Vec<ReportEntry> = state
        .reports
        .list()
        .await?
        .iter()
        .map(ReportEntry::from)
        .collect();
    Ok(Json(ReportListResponse {
        total: reports.len(),
        reports,
    }))
}
