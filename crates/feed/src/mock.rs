//! 合成数据生成器。上游不可用或未配置时由 `ExternalData` 调用，结果从不写入缓存。

use chrono::{DateTime, Duration, Utc};
use ictdash_core::common::round_to;
use ictdash_core::common::time::rfc3339;
use ictdash_core::external::entity::{
    Connectivity, CountryInfo, ForecastDay, IpLocation, NewsArticle, SOURCE_SIMULATED, Weather,
};
use rand::Rng;
use rand::seq::SliceRandom;

const WEATHER_DESCRIPTIONS: [&str; 6] = [
    "clear sky",
    "few clouds",
    "scattered clouds",
    "broken clouds",
    "light rain",
    "moderate rain",
];

const FORECAST_DESCRIPTIONS: [&str; 3] = ["sunny", "cloudy", "rainy"];

const FORECAST_BASE_TEMP: f64 = 25.0;

const UNKNOWN: &str = "Unknown";

// (title, source, url)
const SAMPLE_HEADLINES: [(&str, &str, &str); 5] = [
    (
        "UNDP launches new sustainability initiative across 50 countries",
        "UNDP News",
        "https://www.undp.org",
    ),
    (
        "Global ICT infrastructure sees record growth in developing nations",
        "Tech World",
        "https://www.undp.org",
    ),
    (
        "AI transforming data-driven governance in public sector",
        "Digital Gov",
        "https://www.undp.org",
    ),
    (
        "UN agencies collaborate on digital inclusion framework",
        "UN News",
        "https://www.un.org",
    ),
    (
        "Cloud technologies improve disaster resilience and response",
        "Cloud Tech",
        "https://www.undp.org",
    ),
];

fn simulated() -> Option<String> {
    Some(SOURCE_SIMULATED.to_string())
}

/// # Summary
/// 合成当前天气，气温随纬度升高而降低。
///
/// # Logic
/// 基准温度 `30 - |lat| * 0.5`，气温 ±5、体感 ±3 (一位小数)。
pub fn weather<R: Rng + ?Sized>(rng: &mut R, latitude: f64, now: DateTime<Utc>) -> Weather {
    let base = 30.0 - latitude.abs() * 0.5;
    Weather {
        temperature: round_to(base + rng.gen_range(-5.0..=5.0), 1),
        feels_like: round_to(base + rng.gen_range(-3.0..=3.0), 1),
        humidity: rng.gen_range(40..=90),
        pressure: rng.gen_range(1000..=1020),
        description: WEATHER_DESCRIPTIONS
            .choose(rng)
            .copied()
            .unwrap_or_default()
            .to_string(),
        icon: "01d".to_string(),
        wind_speed: round_to(rng.gen_range(0.0..=10.0), 1),
        clouds: rng.gen_range(0..=100),
        timestamp: rfc3339(now),
        source: simulated(),
    }
}

/// 从 `now` 所在日期起连续 `days` 天的预报
pub fn forecast<R: Rng + ?Sized>(rng: &mut R, days: u32, now: DateTime<Utc>) -> Vec<ForecastDay> {
    (0..days)
        .map(|i| ForecastDay {
            date: (now + Duration::days(i64::from(i)))
                .format("%Y-%m-%d")
                .to_string(),
            temp_max: round_to(FORECAST_BASE_TEMP + rng.gen_range(-3.0..=5.0), 1),
            temp_min: round_to(FORECAST_BASE_TEMP + rng.gen_range(-8.0..=0.0), 1),
            description: FORECAST_DESCRIPTIONS
                .choose(rng)
                .copied()
                .unwrap_or_default()
                .to_string(),
            humidity: rng.gen_range(40..=90),
        })
        .collect()
}

/// 无法定位时的占位结果，坐标随机
pub fn ip_location<R: Rng + ?Sized>(rng: &mut R, ip: &str, now: DateTime<Utc>) -> IpLocation {
    IpLocation {
        ip: ip.to_string(),
        country: UNKNOWN.to_string(),
        country_code: "XX".to_string(),
        region: UNKNOWN.to_string(),
        city: UNKNOWN.to_string(),
        latitude: round_to(rng.gen_range(-60.0..=70.0), 4),
        longitude: round_to(rng.gen_range(-180.0..=180.0), 4),
        timezone: "UTC".to_string(),
        isp: UNKNOWN.to_string(),
        timestamp: rfc3339(now),
        source: simulated(),
    }
}

/// 无法查询时的国家占位结果，名称即代码
pub fn country<R: Rng + ?Sized>(rng: &mut R, code: &str, now: DateTime<Utc>) -> CountryInfo {
    CountryInfo {
        name: code.to_string(),
        official_name: code.to_string(),
        capital: "N/A".to_string(),
        region: UNKNOWN.to_string(),
        subregion: "N/A".to_string(),
        population: rng.gen_range(1_000_000..=100_000_000),
        languages: Vec::new(),
        currencies: Vec::new(),
        timezones: vec!["UTC".to_string()],
        flag: String::new(),
        timestamp: rfc3339(now),
        source: simulated(),
    }
}

pub fn connectivity<R: Rng + ?Sized>(rng: &mut R, country_code: &str) -> Connectivity {
    Connectivity {
        country_code: country_code.to_string(),
        average_speed_mbps: round_to(rng.gen_range(5.0..=100.0), 2),
        reliability_score: round_to(rng.gen_range(60.0..=99.0), 1),
        coverage_percentage: round_to(rng.gen_range(70.0..=99.0), 1),
        providers_count: rng.gen_range(3..=15),
        fiber_availability: rng.gen_bool(0.5),
        satellite_availability: true,
        estimated_latency_ms: round_to(rng.gen_range(20.0..=200.0), 1),
    }
}

/// 从固定的样例头条中随机抽取至多 `limit` 条，不重复
pub fn headlines<R: Rng + ?Sized>(
    rng: &mut R,
    limit: usize,
    now: DateTime<Utc>,
) -> Vec<NewsArticle> {
    let published_at = rfc3339(now);
    SAMPLE_HEADLINES
        .choose_multiple(rng, limit.min(SAMPLE_HEADLINES.len()))
        .map(|(title, source, url)| NewsArticle {
            title: title.to_string(),
            source: source.to_string(),
            url: url.to_string(),
            published_at: published_at.clone(),
        })
        .collect()
}
