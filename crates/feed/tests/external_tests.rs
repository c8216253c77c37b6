use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;
use chrono::{TimeZone, Utc};
use ictdash_cache::file::FileCache;
use ictdash_core::cache::port::Cache;
use ictdash_core::common::install_crypto_provider;
use ictdash_core::common::time::{FakeClockProvider, TimeProvider};
use ictdash_core::config::AppConfig;
use ictdash_core::external::entity::SOURCE_SIMULATED;
use ictdash_core::external::port::{CountrySource, IpLocationSource, NewsSource, WeatherSource};
use ictdash_core::testing::UnreachableUpstream;
use ictdash_feed::external::{ExternalData, Upstreams};
use ictdash_feed::ip_api::IpApiClient;
use ictdash_feed::news::TheNewsApiClient;
use ictdash_feed::rest_countries::RestCountriesClient;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

async fn owm_weather(
    State(hits): State<Hits>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    hits.bump();
    assert_eq!(q.get("units").map(String::as_str), Some("metric"));
    assert_eq!(q.get("appid").map(String::as_str), Some("test-key"));
    Json(json!({
        "main": {"temp": 21.4, "feels_like": 20.9, "humidity": 64, "pressure": 1014},
        "weather": [{"description": "broken clouds", "icon": "04d"}],
        "wind": {"speed": 3.6},
        "clouds": {"all": 75}
    }))
}

async fn ip_api(State(hits): State<Hits>, Path(ip): Path<String>) -> Json<Value> {
    hits.bump();
    if ip.starts_with("10.") {
        return Json(json!({"status": "fail", "message": "private range", "query": ip}));
    }
    Json(json!({
        "status": "success", "country": "United States", "countryCode": "US",
        "regionName": "Virginia", "city": "Ashburn", "lat": 39.03, "lon": -77.5,
        "timezone": "America/New_York", "isp": "Google LLC", "query": ip
    }))
}

async fn country(State(hits): State<Hits>, Path(code): Path<String>) -> impl IntoResponse {
    hits.bump();
    if code != "KE" {
        return (StatusCode::NOT_FOUND, Json(json!({"status": 404, "message": "Not Found"})));
    }
    (
        StatusCode::OK,
        Json(json!([{
            "name": {"common": "Kenya", "official": "Republic of Kenya"},
            "capital": ["Nairobi"],
            "region": "Africa",
            "subregion": "Eastern Africa",
            "population": 53771300,
            "languages": {"eng": "English", "swa": "Swahili"},
            "currencies": {"KES": {"name": "Kenyan shilling", "symbol": "Sh"}},
            "timezones": ["UTC+03:00"],
            "flags": {"png": "https://flagcdn.com/w320/ke.png"}
        }])),
    )
}

async fn news(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    if q.get("api_token").map(String::as_str) == Some("empty") {
        return Json(json!({"meta": {}, "data": []}));
    }
    Json(json!({"data": [
        {"title": "First", "source": "a.example", "url": "https://a.example/1",
         "published_at": "2026-03-01T08:00:00.000000Z"},
        {"title": "Second"},
        {"title": "Third", "source": "c.example"}
    ]}))
}

/// 在随机端口启动上游桩服务，返回基础地址与计数器
async fn spawn_stub() -> (String, Hits) {
    install_crypto_provider();
    let hits = Hits::default();
    let app = Router::new()
        .route("/owm/weather", get(owm_weather))
        .route("/ip/{ip}", get(ip_api))
        .route("/countries/alpha/{code}", get(country))
        .route("/news", get(news))
        .with_state(hits.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://127.0.0.1:{}", listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, hits)
}

fn stub_config(base: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.external.openweather_api_key = "test-key".to_string();
    config.external.news_api_key = "test-token".to_string();
    config.external.openweather_base_url = format!("{base}/owm");
    config.external.ip_api_base_url = format!("{base}/ip");
    config.external.countries_base_url = format!("{base}/countries");
    // 未挂载的路由，时间接口走本地回退
    config.external.world_time_base_url = format!("{base}/missing");
    config.external.news_base_url = format!("{base}/news");
    config.external.timeout_secs = 2;
    config
}

fn clock() -> Arc<dyn TimeProvider> {
    Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ))
}

struct Fixture {
    data: ExternalData,
    weather_cache: Arc<FileCache>,
    geo_cache: Arc<FileCache>,
    _tmp: tempfile::TempDir,
}

fn fixture(upstreams: Upstreams) -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let weather_cache = Arc::new(
        FileCache::new(tmp.path().join("weather"), Duration::from_secs(1800)).unwrap(),
    );
    let geo_cache =
        Arc::new(FileCache::new(tmp.path().join("geo"), Duration::from_secs(86_400)).unwrap());
    let data = ExternalData::new(upstreams, weather_cache.clone(), geo_cache.clone(), clock());
    Fixture {
        data,
        weather_cache,
        geo_cache,
        _tmp: tmp,
    }
}

fn unreachable_upstreams(upstream: &Arc<UnreachableUpstream>, with_keys: bool) -> Upstreams {
    let weather: Option<Arc<dyn WeatherSource>> = if with_keys {
        Some(upstream.clone())
    } else {
        None
    };
    let news: Option<Arc<dyn NewsSource>> = if with_keys {
        Some(upstream.clone())
    } else {
        None
    };
    Upstreams {
        weather,
        ip_location: upstream.clone(),
        countries: upstream.clone(),
        time: upstream.clone(),
        news,
    }
}

#[tokio::test]
async fn test_weather_cached_after_first_fetch() {
    let (base, hits) = spawn_stub().await;
    let f = fixture(Upstreams::from_config(&stub_config(&base).external, clock()).unwrap());

    let first = f.data.weather(-1.2921, 36.8219).await;
    assert_eq!(first.temperature, 21.4);
    assert_eq!(first.description, "broken clouds");
    assert!(first.source.is_none());
    assert_eq!(first.timestamp, "2026-03-01T12:00:00Z");
    assert!(f.weather_cache.entry_path("-1.2921_36.8219").unwrap().exists());

    let second = f.data.weather(-1.2921, 36.8219).await;
    assert_eq!(second, first);
    assert_eq!(hits.get(), 1);
}

#[tokio::test]
async fn test_geo_lookups_through_stub() {
    let (base, hits) = spawn_stub().await;
    let f = fixture(Upstreams::from_config(&stub_config(&base).external, clock()).unwrap());

    let ip: IpAddr = "8.8.8.8".parse().unwrap();
    let loc = f.data.ip_location(ip).await;
    assert_eq!(loc.country_code, "US");
    assert_eq!(loc.region, "Virginia");
    assert_eq!(loc.timestamp, "2026-03-01T12:00:00Z");
    assert!(f.geo_cache.entry_path("ip_8.8.8.8").unwrap().exists());

    // 小写代码与大写代码共享同一缓存条目
    let ke = f.data.country("ke").await;
    assert_eq!(ke.name, "Kenya");
    assert_eq!(ke.capital, "Nairobi");
    assert_eq!(ke.languages, vec!["English", "Swahili"]);
    assert_eq!(ke.currencies, vec!["KES"]);
    assert_eq!(ke.timestamp, "2026-03-01T12:00:00Z");
    let again = f.data.country("KE").await;
    assert_eq!(again.official_name, "Republic of Kenya");
    assert_eq!(hits.get(), 2);

    // 上游 404 回退为合成数据且不缓存
    let zz = f.data.country("ZZ").await;
    assert_eq!(zz.source.as_deref(), Some(SOURCE_SIMULATED));
    assert!(!f.geo_cache.entry_path("country_ZZ").unwrap().exists());
}

#[tokio::test]
async fn test_ip_api_failure_status_is_no_data() {
    let (base, _hits) = spawn_stub().await;
    let client = IpApiClient::new(&format!("{base}/ip"), Duration::from_secs(2), clock()).unwrap();
    let err = client.locate("10.1.2.3".parse().unwrap()).await.unwrap_err();
    assert!(err.to_string().contains("private range"));

    let countries = RestCountriesClient::new(
        &format!("{base}/countries"),
        Duration::from_secs(2),
        clock(),
    )
    .unwrap();
    assert!(countries.country("ZZ").await.is_err());
}

#[tokio::test]
async fn test_news_defaults_and_truncation() {
    let (base, _hits) = spawn_stub().await;
    let client = TheNewsApiClient::new(
        &format!("{base}/news"),
        "test-token",
        Duration::from_secs(2),
        clock(),
    )
    .unwrap();

    let articles = client.headlines("en", 2).await.unwrap();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].published_at, "2026-03-01T08:00:00.000000Z");
    assert_eq!(articles[1].source, "Unknown");
    assert_eq!(articles[1].published_at, "2026-03-01T12:00:00Z");
    assert_eq!(articles[1].url, "#");

    // 空结果集由门面替换为样例头条
    let mut config = stub_config(&base);
    config.external.news_api_key = "empty".to_string();
    let f = fixture(Upstreams::from_config(&config.external, clock()).unwrap());
    let fallback = f.data.headlines("en", 5).await;
    assert_eq!(fallback.len(), 5);
    assert!(fallback.iter().all(|a| a.published_at == "2026-03-01T12:00:00Z"));
}

#[tokio::test]
async fn test_unreachable_upstream_falls_back_without_caching() {
    let upstream = Arc::new(UnreachableUpstream::default());
    let f = fixture(unreachable_upstreams(&upstream, true));

    let w = f.data.weather(51.5074, -0.1278).await;
    assert_eq!(w.source.as_deref(), Some(SOURCE_SIMULATED));
    assert_eq!(w.icon, "01d");
    let loc = f.data.ip_location("1.1.1.1".parse().unwrap()).await;
    assert_eq!(loc.source.as_deref(), Some(SOURCE_SIMULATED));
    assert_eq!(loc.ip, "1.1.1.1");
    let c = f.data.country("KE").await;
    assert_eq!(c.source.as_deref(), Some(SOURCE_SIMULATED));

    // 合成数据不写入缓存，下一次仍然访问上游
    assert!(f.weather_cache.get_raw("51.5074_-0.1278").await.unwrap().is_none());
    assert!(f.geo_cache.get_raw("country_KE").await.unwrap().is_none());
    f.data.country("KE").await;
    assert_eq!(upstream.call_count(), 4);

    let news = f.data.headlines("en", 3).await;
    assert_eq!(news.len(), 3);
    assert_eq!(upstream.call_count(), 5);
}

#[tokio::test]
async fn test_missing_keys_skip_upstream() {
    let upstream = Arc::new(UnreachableUpstream::default());
    let f = fixture(unreachable_upstreams(&upstream, false));

    let w = f.data.weather(0.0, 0.0).await;
    assert_eq!(w.source.as_deref(), Some(SOURCE_SIMULATED));
    let news = f.data.headlines("en", 5).await;
    assert_eq!(news.len(), 5);
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn test_cached_entry_served_without_upstream() {
    let upstream = Arc::new(UnreachableUpstream::default());
    let f = fixture(unreachable_upstreams(&upstream, true));

    let cached = json!({
        "temperature": 18.0, "feels_like": 17.0, "humidity": 70, "pressure": 1011,
        "description": "light rain", "icon": "10d", "wind_speed": 4.1, "clouds": 90,
        "timestamp": "2026-03-01T11:45:00Z"
    });
    f.weather_cache
        .set_raw("10_20", serde_json::to_vec(&cached).unwrap())
        .await
        .unwrap();

    let w = f.data.weather(10.0, 20.0).await;
    assert_eq!(w.description, "light rain");
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn test_time_falls_back_to_local_zone_db() {
    let upstream = Arc::new(UnreachableUpstream::default());
    let f = fixture(unreachable_upstreams(&upstream, true));

    let zt = f.data.zone_time("Africa/Nairobi").await.unwrap();
    assert_eq!(zt.datetime, "2026-03-01T15:00:00+03:00");
    assert_eq!(zt.utc_offset, "+03:00");
    assert!(f.data.zone_time("Not/AZone").await.is_none());

    let zones = f.data.timezones().await;
    assert!(zones.iter().any(|z| z == "Asia/Kolkata"));
    assert!(zones.len() > 300);
}

#[tokio::test]
async fn test_forecast_and_connectivity_are_synthetic() {
    let upstream = Arc::new(UnreachableUpstream::default());
    let f = fixture(unreachable_upstreams(&upstream, true));

    let days = f.data.forecast(5);
    assert_eq!(days.len(), 5);
    assert_eq!(days[0].date, "2026-03-01");
    assert_eq!(days[4].date, "2026-03-05");

    let c = f.data.connectivity("KE");
    assert_eq!(c.country_code, "KE");
    assert!(c.satellite_availability);
    assert!((3..=15).contains(&c.providers_count));
    assert_eq!(upstream.call_count(), 0);
}
