//! # API 服务启动器
//!
//! 组装 axum 路由、挂载 Swagger UI、配置 CORS 并绑定 TCP 端口对外提供服务。
//! 本模块不直接启动 `main()`, 而是由 `crates/app` 的 DI 容器持有并调用。

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use utoipa_swagger_ui::SwaggerUi;

use ictdash_core::common::time::TimeProvider;
use ictdash_core::config::AppConfig;
use ictdash_core::store::port::InventoryStore;
use ictdash_feed::external::ExternalData;
use ictdash_snmp::service::SnmpService;
use ictdash_telemetry::analytics::AnalyticsService;
use ictdash_telemetry::report::ReportService;
use ictdash_telemetry::simulator::MetricsSimulator;

use crate::error::not_found_fallback;
use crate::routes::{analytics, devices, external, offices, snmp, system};

// ============================================================
//  共享应用状态
// ============================================================

/// 全局应用状态，通过 axum 的 `State` 提取器注入到每个 Handler 中。
///
/// # Invariants
/// - 所有服务在服务启动前由 DI 容器注入，生命周期与进程等同。
#[derive(Clone)]
pub struct AppState {
    /// 运行配置 (版本号、环境、SNMP 默认值)
    pub config: Arc<AppConfig>,
    /// 办公室与设备清单
    pub inventory: Arc<dyn InventoryStore>,
    /// 设备指标模拟器
    pub simulator: Arc<MetricsSimulator>,
    /// 全局分析
    pub analytics: Arc<AnalyticsService>,
    /// 报告生成与查询
    pub reports: Arc<ReportService>,
    /// 天气、地理、时间、新闻
    pub external: Arc<ExternalData>,
    /// SNMP 轮询
    pub snmp: Arc<SnmpService>,
    /// 时钟
    pub clock: Arc<dyn TimeProvider>,
}

// ============================================================
//  OpenAPI 文档定义
// ============================================================

/// 全局 OpenAPI 文档结构
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ICT Infrastructure Dashboard API",
        version = "0.1.0",
        description = "办公室/设备清单、模拟遥测分析、外部数据聚合与 SNMP 轮询的 RESTful API。",
        contact(name = "ICT Dashboard Team"),
        license(name = "MIT")
    ),
    tags(
        (name = "系统 (System)", description = "健康检查与接口索引"),
        (name = "办公室 (Offices)", description = "国家办公室清单"),
        (name = "设备 (Devices)", description = "网络设备清单与模拟指标"),
        (name = "分析 (Analytics)", description = "全局概览、告警、趋势与报告"),
        (name = "外部数据 (External)", description = "天气、地理、时间与新闻"),
        (name = "SNMP", description = "SNMP v2c 设备轮询")
    )
)]
pub struct ApiDoc;

// ============================================================
//  服务构建与启动
// ============================================================

/// # Summary
/// 构建完整的 axum 应用路由树。
///
/// # Logic
/// 1. 注册系统、办公室、设备、分析、外部数据路由。
/// 2. `snmp.enabled` 为真时追加 SNMP 路由组。
/// 3. 合并 Swagger UI，挂载 JSON 404 兜底、CORS 与请求追踪。
pub fn build_router(state: AppState) -> Router {
    let core_router = OpenApiRouter::new()
        .routes(routes!(system::health))
        .routes(routes!(system::api_index))
        .route("/api", get(system::api_index))
        .routes(routes!(offices::list_offices, offices::create_office))
        .routes(routes!(offices::get_office))
        .routes(routes!(offices::get_office_devices))
        .routes(routes!(devices::list_devices))
        .routes(routes!(devices::get_device))
        .routes(routes!(devices::get_device_metrics))
        .routes(routes!(devices::get_device_status))
        .routes(routes!(devices::get_device_alerts))
        .routes(routes!(analytics::get_summary))
        .routes(routes!(analytics::get_region))
        .routes(routes!(analytics::get_alerts))
        .routes(routes!(analytics::get_trends))
        .routes(routes!(analytics::get_top_performers))
        .routes(routes!(analytics::get_device_distribution))
        .routes(routes!(analytics::get_health_score))
        .routes(routes!(analytics::generate_report))
        .routes(routes!(analytics::get_report))
        .routes(routes!(analytics::list_reports))
        .routes(routes!(external::get_office_weather))
        .routes(routes!(external::get_office_forecast))
        .routes(routes!(external::get_ip_location))
        .routes(routes!(external::get_country))
        .routes(routes!(external::convert_time))
        .routes(routes!(external::get_office_time))
        .routes(routes!(external::list_timezones))
        .routes(routes!(external::get_distance))
        .routes(routes!(external::get_connectivity))
        .routes(routes!(external::get_news));

    let snmp_router = if state.config.snmp.enabled {
        OpenApiRouter::new()
            .routes(routes!(snmp::get_device_info))
            .routes(routes!(snmp::get_cpu))
            .routes(routes!(snmp::get_memory))
            .routes(routes!(snmp::get_interface))
            .routes(routes!(snmp::get_metrics))
            .routes(routes!(snmp::walk))
            .routes(routes!(snmp::discover))
    } else {
        tracing::info!("SNMP monitoring disabled");
        OpenApiRouter::new()
    };

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(core_router)
        .merge(snmp_router)
        .with_state(state)
        .split_for_parts();

    // 看板前端与 API 不同源，允许所有来源
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .fallback(not_found_fallback)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// 构建路由树并启动 HTTP 监听，`shutdown` 完成后优雅退出。
///
/// # Arguments
/// * `state` - 由外部 DI 容器注入的共享状态
/// * `bind_addr` - 监听的地址与端口，如 `"0.0.0.0:8000"`
/// * `shutdown` - 停机信号 (通常为 Ctrl-C)
pub async fn start_server(
    state: AppState,
    bind_addr: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!("ICT Dashboard API listening on {}", bind_addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("API server stopped");
    Ok(())
}
