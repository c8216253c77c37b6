//! # 配置加载
//!
//! 分层合并：内置默认值 → `<dir>/default.toml` → `<dir>/local.toml` →
//! `ICTDASH__` 前缀的环境变量 → 约定俗成的独立环境变量。

use config::{Config, ConfigError, Environment, File};
use ictdash_core::config::AppConfig;
use std::path::Path;

/// # Summary
/// 从配置目录与环境变量构建 `AppConfig`。
///
/// # Logic
/// 1. 以 `AppConfig::default()` 作为最底层。
/// 2. 两个 TOML 文件都是可选的，后者覆盖前者。
/// 3. 嵌套字段用 `__` 分隔，如 `ICTDASH__SERVER__PORT=9000`。
/// 4. 最后应用 `OPENWEATHER_API_KEY`、`NEWS_API_KEY`、`PORT`。
pub fn load(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let layered: AppConfig = Config::builder()
        .add_source(Config::try_from(&AppConfig::default())?)
        .add_source(File::from(config_dir.join("default.toml")).required(false))
        .add_source(File::from(config_dir.join("local.toml")).required(false))
        .add_source(
            Environment::with_prefix("ICTDASH")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()?;

    Ok(apply_conventional_env(layered, |name| std::env::var(name).ok()))
}

/// # Summary
/// 应用不带前缀的常用环境变量。
///
/// # Logic
/// 1. 空字符串视为未设置。
/// 2. `PORT` 无法解析为端口号时忽略并告警。
pub fn apply_conventional_env(
    mut config: AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> AppConfig {
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = var("OPENWEATHER_API_KEY") {
        config.external.openweather_api_key = key;
    }
    if let Some(key) = var("NEWS_API_KEY") {
        config.external.news_api_key = key;
    }
    if let Some(port) = var("PORT") {
        match port.trim().parse::<u16>() {
            Ok(p) => config.server.port = p,
            Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
        }
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_files_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[server]\nport = 9000\nenvironment = \"production\"\n\n[snmp]\ndefault_community = \"monitor\"\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("local.toml"), "[snmp]\nenabled = false\n").unwrap();

        let config = load(dir.path()).unwrap();
        assert_eq!(config.server.port, 9000);
        assert!(config.is_production());
        assert_eq!(config.snmp.default_community, "monitor");
        assert!(!config.snmp.enabled);
        assert_eq!(config.cache.weather_ttl_secs, 1800);
    }

    #[test]
    fn test_missing_files_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(dir.path()).unwrap();
        assert_eq!(config.snmp.default_port, 161);
        assert_eq!(config.data.seed_file, "seed_data.json");
    }

    #[test]
    fn test_conventional_env() {
        let vars: HashMap<&str, &str> = [
            ("OPENWEATHER_API_KEY", "ow-key"),
            ("NEWS_API_KEY", "  "),
            ("PORT", "8080"),
        ]
        .into_iter()
        .collect();
        let config = apply_conventional_env(AppConfig::default(), |name| {
            vars.get(name).map(|v| v.to_string())
        });
        assert_eq!(config.external.openweather_api_key, "ow-key");
        assert!(config.external.news_api_key.is_empty());
        assert_eq!(config.server.port, 8080);

        let config = apply_conventional_env(AppConfig::default(), |name| {
            (name == "PORT").then(|| "eighty".to_string())
        });
        assert_eq!(config.server.port, 8000);
    }
}
