mod logging;
mod settings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ictdash_api::server::{AppState, start_server};
use ictdash_cache::file::FileCache;
use ictdash_core::cache::port::Cache;
use ictdash_core::common::time::{RealTimeProvider, TimeProvider};
use ictdash_core::config::AppConfig;
use ictdash_core::store::port::InventoryStore;
use ictdash_feed::external::{ExternalData, Upstreams};
use ictdash_snmp::client::UdpSnmpClient;
use ictdash_snmp::service::SnmpService;
use ictdash_store::inventory::JsonInventoryStore;
use ictdash_store::report::FileReportStore;
use ictdash_telemetry::analytics::AnalyticsService;
use ictdash_telemetry::report::ReportService;
use ictdash_telemetry::simulator::MetricsSimulator;
use tracing::info;

const CACHE_DIRS: [&str; 3] = ["weather", "geo", "reports"];

#[derive(Parser, Debug)]
#[command(name = "ictdash", version, about = "ICT infrastructure dashboard backend")]
struct Cli {
    /// 存放 default.toml / local.toml 的目录
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 启动 HTTP 服务 (默认)
    Serve,
    /// 清空 weather / geo / reports 缓存目录
    ClearCache,
}

/// # Summary
/// 应用启动入口，纯粹的 DI 容器。
///
/// # Logic
/// 1. 读取 `.env` 与分层配置。
/// 2. 初始化全局日志。
/// 3. 按子命令启动服务或清理缓存。
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let config = settings::load(&cli.config_dir)?;

    let _log_guard = logging::init(&config.logs_dir())?;
    match dotenv {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env file loaded: {}", e),
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::ClearCache => clear_cache(&config).await,
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "ICT Dashboard starting ({} environment)",
        config.server.environment
    );
    ictdash_core::common::install_crypto_provider();

    let bind_addr = config.bind_addr();
    let state = build_state(config)?;
    info!("Dashboard API: http://{}{}", bind_addr, state.config.api_prefix());

    start_server(state, &bind_addr, shutdown_signal()).await
}

/// # Summary
/// 实例化全部具体实现并注入到 `AppState`。
///
/// # Logic
/// 1. 基础设施层：文件缓存、种子清单、报告存储、上游 HTTP 客户端、SNMP UDP 客户端。
/// 2. 领域服务层：模拟器、分析、报告、外部数据门面、SNMP 轮询。
fn build_state(config: AppConfig) -> Result<AppState, Box<dyn std::error::Error>> {
    let clock: Arc<dyn TimeProvider> = Arc::new(RealTimeProvider);

    let weather_cache: Arc<dyn Cache> = Arc::new(FileCache::new(
        config.cache_dir("weather"),
        Duration::from_secs(config.cache.weather_ttl_secs),
    )?);
    let geo_cache: Arc<dyn Cache> = Arc::new(FileCache::new(
        config.cache_dir("geo"),
        Duration::from_secs(config.cache.geo_ttl_secs),
    )?);
    let report_store = Arc::new(FileReportStore::new(config.cache_dir("reports"))?);

    let seed_path = config.seed_path();
    info!("Inventory seed: {}", seed_path.display());
    let inventory: Arc<dyn InventoryStore> =
        Arc::new(JsonInventoryStore::new(seed_path, clock.clone()));

    let analytics = Arc::new(AnalyticsService::new(inventory.clone(), clock.clone()));
    let reports = Arc::new(ReportService::new(
        analytics.clone(),
        report_store,
        clock.clone(),
    ));
    let external = Arc::new(ExternalData::new(
        Upstreams::from_config(&config.external, clock.clone())?,
        weather_cache,
        geo_cache,
        clock.clone(),
    ));

    let snmp_client = Arc::new(UdpSnmpClient::new(Duration::from_secs(
        config.snmp.timeout_secs,
    )));
    let snmp = Arc::new(SnmpService::new(snmp_client, clock.clone()));
    if !config.snmp.enabled {
        info!("SNMP polling disabled");
    }

    Ok(AppState {
        config: Arc::new(config),
        inventory,
        simulator: Arc::new(MetricsSimulator::new(clock.clone())),
        analytics,
        reports,
        external,
        snmp,
        clock,
    })
}

async fn clear_cache(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    for name in CACHE_DIRS {
        // TTL 对清理无影响
        let cache = FileCache::new(config.cache_dir(name), Duration::ZERO)?;
        cache.clear().await?;
    }
    info!("Cache cleared");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
