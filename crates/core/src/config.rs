use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 全局应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub data: DataConfig,
    pub cache: CacheConfig,
    pub external: ExternalConfig,
    pub snmp: SnmpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    // development / production
    pub environment: String,
    pub api_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    pub data_dir: String,
    // 相对 data_dir 的种子文件名
    pub seed_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub weather_ttl_secs: u64,
    pub geo_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    // 为空表示不调用上游，直接使用合成数据
    pub openweather_api_key: String,
    pub news_api_key: String,
    pub openweather_base_url: String,
    pub ip_api_base_url: String,
    pub countries_base_url: String,
    pub world_time_base_url: String,
    pub news_base_url: String,
    pub timeout_secs: u64,
    pub news_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnmpConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    pub default_community: String,
    pub default_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
                environment: "development".to_string(),
                api_version: "v1".to_string(),
            },
            data: DataConfig {
                data_dir: "data".to_string(),
                seed_file: "seed_data.json".to_string(),
            },
            cache: CacheConfig {
                weather_ttl_secs: 1800,
                geo_ttl_secs: 86400,
            },
            external: ExternalConfig {
                openweather_api_key: String::new(),
                news_api_key: String::new(),
                openweather_base_url: "https://api.openweathermap.org/data/2.5".to_string(),
                ip_api_base_url: "http://ip-api.com/json".to_string(),
                countries_base_url: "https://restcountries.com/v3.1".to_string(),
                world_time_base_url: "http://worldtimeapi.org/api".to_string(),
                news_base_url: "https://api.thenewsapi.com/v1/news/headlines".to_string(),
                timeout_secs: 5,
                news_timeout_secs: 10,
            },
            snmp: SnmpConfig {
                enabled: true,
                timeout_secs: 2,
                default_community: "public".to_string(),
                default_port: 161,
            },
        }
    }
}

impl AppConfig {
    /// 监听地址，如 `0.0.0.0:8000`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// REST 前缀，如 `/api/v1`
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.server.api_version)
    }

    pub fn is_production(&self) -> bool {
        self.server.environment.eq_ignore_ascii_case("production")
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.data_dir)
    }

    pub fn seed_path(&self) -> PathBuf {
        self.data_dir().join(&self.data.seed_file)
    }

    /// `<data_dir>/cache/<name>`，name 为 weather / geo / reports
    pub fn cache_dir(&self, name: &str) -> PathBuf {
        self.data_dir().join("cache").join(name)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir().join("logs")
    }
}
