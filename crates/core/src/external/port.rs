use super::entity::{CountryInfo, IpLocation, NewsArticle, Weather, ZoneTime};
use super::error::FeedError;
use async_trait::async_trait;
use std::net::IpAddr;

/// # Summary
/// 当前天气上游接口。
///
/// # Invariants
/// - 每次调用最多发起一次上游请求，不重试。
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// 查询坐标点的当前天气
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather, FeedError>;
}

/// IP 地理定位上游接口
#[async_trait]
pub trait IpLocationSource: Send + Sync {
    /// 定位 IP 地址
    async fn locate(&self, ip: IpAddr) -> Result<IpLocation, FeedError>;
}

/// 国家元数据上游接口
#[async_trait]
pub trait CountrySource: Send + Sync {
    /// 按 ISO 3166 alpha-2/alpha-3 代码查询
    async fn country(&self, code: &str) -> Result<CountryInfo, FeedError>;
}

/// # Summary
/// 世界时间上游接口。
#[async_trait]
pub trait TimeSource: Send + Sync {
    /// 查询时区当前时间
    async fn zone_time(&self, timezone: &str) -> Result<ZoneTime, FeedError>;

    /// 列出上游已知的全部时区名
    async fn zone_names(&self) -> Result<Vec<String>, FeedError>;
}

/// 新闻头条上游接口
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// 获取最新头条，最多 `max_items` 条
    async fn headlines(&self, language: &str, max_items: usize)
    -> Result<Vec<NewsArticle>, FeedError>;
}
