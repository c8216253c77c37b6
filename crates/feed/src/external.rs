use crate::ip_api::IpApiClient;
use crate::mock;
use crate::news::TheNewsApiClient;
use crate::openweather::OpenWeatherClient;
use crate::rest_countries::RestCountriesClient;
use crate::world_time::WorldTimeClient;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use ictdash_core::cache::port::{Cache, CacheExt};
use ictdash_core::common::time::TimeProvider;
use ictdash_core::config::ExternalConfig;
use ictdash_core::external::entity::{
    Connectivity, CountryInfo, ForecastDay, IpLocation, NewsArticle, SOURCE_LOCAL,
    TimeConversion, Weather, ZoneTime, ZonedInstant,
};
use ictdash_core::external::error::FeedError;
use ictdash_core::external::port::{
    CountrySource, IpLocationSource, NewsSource, TimeSource, WeatherSource,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

// 不带时区的输入时间可接受的格式
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// # Summary
/// 各上游适配器的集合。
///
/// # Invariants
/// - `weather` / `news` 为 `None` 表示未配置 API key，相应调用直接使用合成数据。
pub struct Upstreams {
    pub weather: Option<Arc<dyn WeatherSource>>,
    pub ip_location: Arc<dyn IpLocationSource>,
    pub countries: Arc<dyn CountrySource>,
    pub time: Arc<dyn TimeSource>,
    pub news: Option<Arc<dyn NewsSource>>,
}

impl Upstreams {
    /// # Summary
    /// 按配置构建真实的 HTTP 适配器。
    ///
    /// # Logic
    /// 1. API key 为空 (或全空白) 的服务不构建客户端。
    /// 2. 新闻接口使用独立的较长超时。
    /// 3. 响应中的本地时间戳一律取自注入的时钟。
    pub fn from_config(
        config: &ExternalConfig,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self, FeedError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let weather: Option<Arc<dyn WeatherSource>> =
            if config.openweather_api_key.trim().is_empty() {
                tracing::warn!("No OpenWeather API key configured, weather will be simulated");
                None
            } else {
                Some(Arc::new(OpenWeatherClient::new(
                    &config.openweather_base_url,
                    &config.openweather_api_key,
                    timeout,
                    clock.clone(),
                )?))
            };

        let news: Option<Arc<dyn NewsSource>> = if config.news_api_key.trim().is_empty() {
            tracing::warn!("No news API key configured, headlines will be sample data");
            None
        } else {
            Some(Arc::new(TheNewsApiClient::new(
                &config.news_base_url,
                &config.news_api_key,
                Duration::from_secs(config.news_timeout_secs),
                clock.clone(),
            )?))
        };

        Ok(Self {
            weather,
            ip_location: Arc::new(IpApiClient::new(
                &config.ip_api_base_url,
                timeout,
                clock.clone(),
            )?),
            countries: Arc::new(RestCountriesClient::new(
                &config.countries_base_url,
                timeout,
                clock,
            )?),
            time: Arc::new(WorldTimeClient::new(&config.world_time_base_url, timeout)?),
            news,
        })
    }
}

/// # Summary
/// 第三方数据门面：统一执行"查缓存 → 调上游 → 写缓存 → 失败回退合成数据"。
///
/// # Invariants
/// - 所有操作都不返回上游错误，失败只记录日志。
/// - 每次未命中最多调用一次上游，不重试。
/// - 只有上游成功的结果会写入缓存，合成数据从不写入。
/// - 同一键的并发写入不加协调，后写者覆盖。
pub struct ExternalData {
    upstreams: Upstreams,
    weather_cache: Arc<dyn Cache>,
    geo_cache: Arc<dyn Cache>,
    clock: Arc<dyn TimeProvider>,
}

impl ExternalData {
    pub fn new(
        upstreams: Upstreams,
        weather_cache: Arc<dyn Cache>,
        geo_cache: Arc<dyn Cache>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            upstreams,
            weather_cache,
            geo_cache,
            clock,
        }
    }

    /// 坐标点的当前天气，缓存键 `{lat}_{lon}`
    pub async fn weather(&self, latitude: f64, longitude: f64) -> Weather {
        let key = format!("{}_{}", latitude, longitude);
        if let Some(hit) = read_cache::<Weather>(self.weather_cache.as_ref(), &key).await {
            return hit;
        }

        let Some(source) = &self.upstreams.weather else {
            return mock::weather(&mut rand::thread_rng(), latitude, self.clock.now());
        };
        match source.current(latitude, longitude).await {
            Ok(weather) => {
                write_cache(self.weather_cache.as_ref(), &key, &weather).await;
                weather
            }
            Err(e) => {
                tracing::warn!("Weather API error for {}: {}", key, e);
                mock::weather(&mut rand::thread_rng(), latitude, self.clock.now())
            }
        }
    }

    /// IP 定位，缓存键 `ip_{ip}`
    pub async fn ip_location(&self, ip: IpAddr) -> IpLocation {
        let key = format!("ip_{}", ip);
        if let Some(hit) = read_cache::<IpLocation>(self.geo_cache.as_ref(), &key).await {
            return hit;
        }

        match self.upstreams.ip_location.locate(ip).await {
            Ok(location) => {
                write_cache(self.geo_cache.as_ref(), &key, &location).await;
                location
            }
            Err(e) => {
                tracing::warn!("IP API error for {}: {}", ip, e);
                mock::ip_location(&mut rand::thread_rng(), &ip.to_string(), self.clock.now())
            }
        }
    }

    /// 国家元数据，缓存键 `country_{CODE}` (代码统一大写)
    pub async fn country(&self, code: &str) -> CountryInfo {
        let code = code.to_ascii_uppercase();
        let key = format!("country_{}", code);
        if let Some(hit) = read_cache::<CountryInfo>(self.geo_cache.as_ref(), &key).await {
            return hit;
        }

        match self.upstreams.countries.country(&code).await {
            Ok(info) => {
                write_cache(self.geo_cache.as_ref(), &key, &info).await;
                info
            }
            Err(e) => {
                tracing::warn!("Countries API error for {}: {}", code, e);
                mock::country(&mut rand::thread_rng(), &code, self.clock.now())
            }
        }
    }

    /// # Summary
    /// 时区当前时间。
    ///
    /// # Logic
    /// 1. 优先请求上游 (不缓存)。
    /// 2. 上游失败时用本地时区库计算，`source` 标记为 `local`。
    /// 3. 本地也无法识别该时区时返回 `None`。
    pub async fn zone_time(&self, timezone: &str) -> Option<ZoneTime> {
        match self.upstreams.time.zone_time(timezone).await {
            Ok(zt) => Some(zt),
            Err(e) => {
                tracing::warn!("Time API error for {}: {}", timezone, e);
                local_zone_time(timezone, self.clock.now())
            }
        }
    }

    /// 全部时区名，上游失败时使用本地时区库
    pub async fn timezones(&self) -> Vec<String> {
        match self.upstreams.time.zone_names().await {
            Ok(names) => names,
            Err(e) => {
                tracing::warn!("Time API error listing zones: {}", e);
                chrono_tz::TZ_VARIANTS
                    .iter()
                    .map(|tz| tz.name().to_string())
                    .collect()
            }
        }
    }

    /// # Summary
    /// 最新头条。
    ///
    /// # Logic
    /// 未配置 key、上游失败或结果为空时均返回样例头条。
    pub async fn headlines(&self, language: &str, max_items: usize) -> Vec<NewsArticle> {
        let Some(source) = &self.upstreams.news else {
            return mock::headlines(&mut rand::thread_rng(), max_items, self.clock.now());
        };
        match source.headlines(language, max_items).await {
            Ok(articles) if !articles.is_empty() => {
                tracing::debug!("Fetched {} articles", articles.len());
                articles
            }
            Ok(_) => {
                tracing::warn!("Empty news result set, using sample headlines");
                mock::headlines(&mut rand::thread_rng(), max_items, self.clock.now())
            }
            Err(e) => {
                tracing::warn!("News API error: {}", e);
                mock::headlines(&mut rand::thread_rng(), max_items, self.clock.now())
            }
        }
    }

    /// 未来 `days` 天的预报 (合成数据)
    pub fn forecast(&self, days: u32) -> Vec<ForecastDay> {
        mock::forecast(&mut rand::thread_rng(), days, self.clock.now())
    }

    /// 国家网络连通性 (合成数据)
    pub fn connectivity(&self, country_code: &str) -> Connectivity {
        mock::connectivity(&mut rand::thread_rng(), country_code)
    }
}

/// 读取新鲜缓存；缓存损坏或读取失败视为未命中
async fn read_cache<T: DeserializeOwned + Send>(cache: &dyn Cache, key: &str) -> Option<T> {
    match cache.get::<T>(key).await {
        Ok(Some(hit)) => {
            tracing::debug!("Cache hit {}", key);
            Some(hit)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::warn!("Cache read failed for {}: {}", key, e);
            None
        }
    }
}

async fn write_cache<T: Serialize + Send + Sync>(cache: &dyn Cache, key: &str, value: &T) {
    if let Err(e) = cache.set(key, value).await {
        tracing::warn!("Cache write failed for {}: {}", key, e);
    }
}

/// # Summary
/// 用本地时区库计算时区当前时间。
///
/// # Returns
/// 无法识别的时区名返回 `None`。
pub fn local_zone_time(timezone: &str, now: DateTime<Utc>) -> Option<ZoneTime> {
    let tz: Tz = timezone.parse().ok()?;
    let local = now.with_timezone(&tz);
    Some(ZoneTime {
        timezone: timezone.to_string(),
        datetime: local.to_rfc3339(),
        utc_offset: local.format("%:z").to_string(),
        day_of_week: local.weekday().num_days_from_sunday(),
        day_of_year: local.ordinal(),
        week_number: local.iso_week().week(),
        source: Some(SOURCE_LOCAL.to_string()),
    })
}

/// # Summary
/// 把时间从一个时区换算到另一个时区。
///
/// # Logic
/// 1. 两个时区名都必须可识别。
/// 2. 输入带偏移 (RFC 3339，含 `Z`) 时直接换算，忽略 `from_tz`。
/// 3. 否则按 `from_tz` 的本地时间解释；夏令时跳过的本地时间无效，重叠时取较早者。
///
/// # Returns
/// 任一输入无效返回 `None`。
pub fn convert_time(time: &str, from_tz: &str, to_tz: &str) -> Option<TimeConversion> {
    let from: Tz = from_tz.parse().ok()?;
    let to: Tz = to_tz.parse().ok()?;

    let converted = match DateTime::parse_from_rfc3339(time) {
        Ok(dt) => dt.with_timezone(&to),
        Err(_) => {
            let naive = parse_naive(time)?;
            from.from_local_datetime(&naive)
                .earliest()?
                .with_timezone(&to)
        }
    };

    Some(TimeConversion {
        original: ZonedInstant {
            time: time.to_string(),
            timezone: from_tz.to_string(),
        },
        converted: ZonedInstant {
            time: converted.to_rfc3339(),
            timezone: to_tz.to_string(),
        },
    })
}

fn parse_naive(time: &str) -> Option<NaiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(time, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(time, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_naive_uses_source_zone() {
        let c = convert_time("2026-03-01T09:00:00", "Africa/Nairobi", "Europe/London").unwrap();
        assert_eq!(c.converted.time, "2026-03-01T06:00:00+00:00");
        assert_eq!(c.original.timezone, "Africa/Nairobi");
    }

    #[test]
    fn test_convert_offset_input() {
        let c = convert_time("2026-07-01T12:00:00Z", "UTC", "Asia/Kolkata").unwrap();
        assert_eq!(c.converted.time, "2026-07-01T17:30:00+05:30");
        let d = convert_time("2026-07-01", "UTC", "America/Lima").unwrap();
        assert_eq!(d.converted.time, "2026-06-30T19:00:00-05:00");
    }

    #[test]
    fn test_convert_rejects_bad_input() {
        assert!(convert_time("yesterday", "UTC", "UTC").is_none());
        assert!(convert_time("2026-03-01T09:00:00", "Mars/Olympus", "UTC").is_none());
        assert!(convert_time("2026-03-01T09:00:00", "UTC", "Nowhere").is_none());
        // 纽约 2026-03-08 02:30 落在夏令时跳变的空档中
        assert!(convert_time("2026-03-08T02:30:00", "America/New_York", "UTC").is_none());
    }

    #[test]
    fn test_local_zone_time() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 22, 30, 0).unwrap();
        let zt = local_zone_time("Asia/Tokyo", now).unwrap();
        assert_eq!(zt.datetime, "2026-03-02T07:30:00+09:00");
        assert_eq!(zt.utc_offset, "+09:00");
        // 2026-03-02 是周一
        assert_eq!(zt.day_of_week, 1);
        assert_eq!(zt.day_of_year, 61);
        assert_eq!(zt.source.as_deref(), Some(SOURCE_LOCAL));
        assert!(local_zone_time("Atlantis/Capital", now).is_none());
    }
}
