use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// # Summary
/// 初始化全局日志：控制台可读格式 + 按天滚动的 JSON 文件。
///
/// # Logic
/// 1. 过滤级别取 `RUST_LOG`，未设置时为 `info`。
/// 2. 文件写入 `<logs_dir>/ictdash.log.<日期>`，经后台线程非阻塞落盘。
///
/// # Returns
/// 返回的 guard 必须持有到进程退出，否则尾部日志可能丢失。
pub fn init(logs_dir: &Path) -> Result<WorkerGuard, Box<dyn std::error::Error>> {
    std::fs::create_dir_all(logs_dir)?;
    let file_appender = tracing_appender::rolling::daily(logs_dir, "ictdash.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_ansi(false),
        )
        .try_init()?;

    Ok(guard)
}
