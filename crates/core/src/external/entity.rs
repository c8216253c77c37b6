use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 合成数据的来源标记
pub const SOURCE_SIMULATED: &str = "simulated";
/// 本地计算 (未经上游) 的来源标记
pub const SOURCE_LOCAL: &str = "local";

/// # Summary
/// 当前天气快照 (公制单位)。
///
/// # Invariants
/// - `source` 为空表示来自上游服务，`simulated` 表示合成数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Weather {
    /// 气温 (°C)
    #[schema(example = 24.3)]
    pub temperature: f64,
    /// 体感温度 (°C)
    pub feels_like: f64,
    /// 相对湿度 (%)
    pub humidity: i64,
    /// 气压 (hPa)
    pub pressure: i64,
    /// 天气描述
    #[schema(example = "scattered clouds")]
    pub description: String,
    /// 图标代码
    #[schema(example = "03d")]
    pub icon: String,
    /// 风速 (m/s)
    pub wind_speed: f64,
    /// 云量 (%)
    pub clouds: i64,
    /// 采集时间 (RFC 3339)
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// 单日天气预报
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastDay {
    #[schema(example = "2026-03-01")]
    pub date: String,
    pub temp_max: f64,
    pub temp_min: f64,
    #[schema(example = "sunny")]
    pub description: String,
    pub humidity: i64,
}

/// # Summary
/// IP 地理定位结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IpLocation {
    #[schema(example = "8.8.8.8")]
    pub ip: String,
    pub country: String,
    #[schema(example = "US")]
    pub country_code: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub isp: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// # Summary
/// 国家元数据。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CountryInfo {
    #[schema(example = "Kenya")]
    pub name: String,
    pub official_name: String,
    #[schema(example = "Nairobi")]
    pub capital: String,
    pub region: String,
    pub subregion: String,
    pub population: u64,
    pub languages: Vec<String>,
    pub currencies: Vec<String>,
    pub timezones: Vec<String>,
    pub flag: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// # Summary
/// 某时区的当前时间。
///
/// # Invariants
/// - `source` 为 `local` 时 `day_of_year`/`week_number` 同样由本地时钟计算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ZoneTime {
    #[schema(example = "Africa/Nairobi")]
    pub timezone: String,
    /// 本地时间 (RFC 3339，带偏移)
    pub datetime: String,
    #[schema(example = "+03:00")]
    pub utc_offset: String,
    /// 0 = 周日
    pub day_of_week: u32,
    pub day_of_year: u32,
    pub week_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// 时间点与所属时区
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ZonedInstant {
    pub time: String,
    pub timezone: String,
}

/// 跨时区换算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TimeConversion {
    pub original: ZonedInstant,
    pub converted: ZonedInstant,
}

/// 新闻头条
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewsArticle {
    pub title: String,
    pub source: String,
    pub url: String,
    pub published_at: String,
}

/// # Summary
/// 国家网络连通性概况 (始终为合成数据)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Connectivity {
    #[schema(example = "KE")]
    pub country_code: String,
    pub average_speed_mbps: f64,
    pub reliability_score: f64,
    pub coverage_percentage: f64,
    pub providers_count: u32,
    pub fiber_availability: bool,
    pub satellite_availability: bool,
    pub estimated_latency_ms: f64,
}
