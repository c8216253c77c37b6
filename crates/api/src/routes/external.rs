//! # 外部数据路由控制器
//!
//! 实现 `/api/v1/external` 路径下的天气、地理、时间、新闻接口。
//! 上游不可用时由 `ExternalData` 返回合成数据，因此这里只处理参数校验与办公室查找。

use std::net::IpAddr;

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::{find_office, parse_param};
use crate::server::AppState;
use crate::types::{
    DistanceResponse, NewsResponse, OfficeForecastResponse, OfficeLocation, OfficeRef,
    OfficeTimeResponse, OfficeWeatherResponse, TimezoneListResponse,
};
use ictdash_core::common::haversine_km;
use ictdash_core::external::entity::{Connectivity, CountryInfo, IpLocation, TimeConversion};
use ictdash_feed::external;

const DEFAULT_FORECAST_DAYS: i64 = 5;
const MAX_FORECAST_DAYS: i64 = 16;
const DEFAULT_NEWS_ITEMS: i64 = 5;
const MAX_NEWS_ITEMS: i64 = 20;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ForecastQuery {
    pub days: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct ConvertQuery {
    pub time: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct DistanceQuery {
    pub office1: Option<String>,
    pub office2: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct NewsQuery {
    pub language: Option<String>,
    pub limit: Option<String>,
}

/// 国家代码必须是 2~3 个 ASCII 字母
fn valid_country_code(code: &str) -> bool {
    (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic())
}

/// 办公室所在地的当前天气
#[utoipa::path(
    get,
    path = "/api/v1/external/weather/{office_id}",
    tag = "外部数据 (External)",
    params(
        ("office_id" = String, Path, description = "办公室 ID")
    ),
    responses(
        (status = 200, description = "天气 (上游、缓存或合成)", body = OfficeWeatherResponse),
        (status = 404, description = "办公室不存在")
    )
)]
pub async fn get_office_weather(
    State(state): State<AppState>,
    Path(office_id): Path<String>,
) -> Result<Json<OfficeWeatherResponse>, ApiError> {
    let inventory = state.inventory.load().await?;
    let office = find_office(&inventory.offices, &office_id)?;
    let weather = state.external.weather(office.latitude, office.longitude).await;

    Ok(Json(OfficeWeatherResponse {
        office_id: office.id.clone(),
        office_name: office.name.clone(),
        location: OfficeLocation::from(office),
        weather,
    }))
}

/// 办公室所在地的天气预报 (合成)
#[utoipa::path(
    get,
    path = "/api/v1/external/weather/forecast/{office_id}",
    tag = "外部数据 (External)",
    params(
        ("office_id" = String, Path, description = "办公室 ID"),
        ("days" = Option<u32>, Query, description = "天数，1~16，默认 5")
    ),
    responses(
        (status = 200, description = "逐日预报", body = OfficeForecastResponse),
        (status = 400, description = "days 非法"),
        (status = 404, description = "办公室不存在")
    )
)]
pub async fn get_office_forecast(
    State(state): State<AppState>,
    Path(office_id): Path<String>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<OfficeForecastResponse>, ApiError> {
    let inventory = state.inventory.load().await?;
    let office = find_office(&inventory.offices, &office_id)?;
    let days = parse_param(
        query.days.as_deref(),
        DEFAULT_FORECAST_DAYS,
        "Invalid days parameter - must be a number",
    )?;
    let days = u32::try_from(days)
        .ok()
        .filter(|d| (1..=MAX_FORECAST_DAYS).contains(&i64::from(*d)))
        .ok_or_else(|| {
            ApiError::bad_request(format!("Days must be between 1 and {}", MAX_FORECAST_DAYS))
        })?;

    Ok(Json(OfficeForecastResponse {
        office_id: office.id.clone(),
        office_name: office.name.clone(),
        forecast: state.external.forecast(days),
    }))
}

/// IP 定位
#[utoipa::path(
    get,
    path = "/api/v1/external/location/ip/{ip}",
    tag = "外部数据 (External)",
    params(
        ("ip" = String, Path, description = "IPv4 或 IPv6 地址")
    ),
    responses(
        (status = 200, description = "定位结果", body = IpLocation),
        (status = 400, description = "IP 地址非法")
    )
)]
pub async fn get_ip_location(
    State(state): State<AppState>,
    Path(ip): Path<String>,
) -> Result<Json<IpLocation>, ApiError> {
    let ip: IpAddr = ip
        .parse()
        .map_err(|_| ApiError::bad_request("Invalid IP address").with("ip", ip.clone()))?;
    Ok(Json(state.external.ip_location(ip).await))
}

/// 国家元数据
#[utoipa::path(
    get,
    path = "/api/v1/external/country/{code}",
    tag = "外部数据 (External)",
    params(
        ("code" = String, Path, description = "ISO 3166 两位或三位字母代码")
    ),
    responses(
        (status = 200, description = "国家信息", body = CountryInfo),
        (status = 400, description = "代码非法")
    )
)]
pub async fn get_country(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<CountryInfo>, ApiError> {
    if !valid_country_code(&code) {
        return Err(ApiError::bad_request("Invalid country code").with("country_code", code));
    }
    Ok(Json(state.external.country(&code).await))
}

/// 办公室当地时间
#[utoipa::path(
    get,
    path = "/api/v1/external/time/{office_id}",
    tag = "外部数据 (External)",
    params(
        ("office_id" = String, Path, description = "办公室 ID")
    ),
    responses(
        (status = 200, description = "当地时间", body = OfficeTimeResponse),
        (status = 404, description = "办公室不存在或时区无法识别")
    )
)]
pub async fn get_office_time(
    State(state): State<AppState>,
    Path(office_id): Path<String>,
) -> Result<Json<OfficeTimeResponse>, ApiError> {
    let inventory = state.inventory.load().await?;
    let office = find_office(&inventory.offices, &office_id)?;
    let zone = state.external.zone_time(&office.timezone).await.ok_or_else(|| {
        ApiError::not_found("Unknown timezone").with("timezone", office.timezone.clone())
    })?;

    Ok(Json(OfficeTimeResponse {
        office_id: office.id.clone(),
        office_name: office.name.clone(),
        local_time: zone.datetime,
        timezone: zone.timezone,
        utc_offset: zone.utc_offset,
    }))
}

/// 全部 IANA 时区名
#[utoipa::path(
    get,
    path = "/api/v1/external/timezones",
    tag = "外部数据 (External)",
    responses(
        (status = 200, description = "时区列表", body = TimezoneListResponse)
    )
)]
pub async fn list_timezones(State(state): State<AppState>) -> Json<TimezoneListResponse> {
    let timezones = state.external.timezones().await;
    Json(TimezoneListResponse {
        total: timezones.len(),
        timezones,
    })
}

/// 时区换算
#[utoipa::path(
    get,
    path = "/api/v1/external/time/convert",
    tag = "外部数据 (External)",
    params(
        ("time" = String, Query, description = "RFC 3339 或 `YYYY-MM-DD HH:MM[:SS]`"),
        ("from" = String, Query, description = "源时区"),
        ("to" = String, Query, description = "目标时区")
    ),
    responses(
        (status = 200, description = "换算结果", body = TimeConversion),
        (status = 400, description = "参数缺失或无法解析")
    )
)]
pub async fn convert_time(Query(query): Query<ConvertQuery>) -> Result<Json<TimeConversion>, ApiError> {
    let (Some(time), Some(from), Some(to)) = (query.time, query.from, query.to) else {
        return Err(ApiError::bad_request("time, from and to parameters required"));
    };
    external::convert_time(&time, &from, &to)
        .map(Json)
        .ok_or_else(|| ApiError::bad_request("Invalid time or timezone"))
}

/// 两个办公室间的大圆距离
#[utoipa::path(
    get,
    path = "/api/v1/external/distance",
    tag = "外部数据 (External)",
    params(
        ("office1" = String, Query, description = "办公室 ID"),
        ("office2" = String, Query, description = "办公室 ID")
    ),
    responses(
        (status = 200, description = "距离 (km)", body = DistanceResponse),
        (status = 400, description = "缺少参数"),
        (status = 404, description = "办公室不存在")
    )
)]
pub async fn get_distance(
    State(state): State<AppState>,
    Query(query): Query<DistanceQuery>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let (Some(id1), Some(id2)) = (
        query.office1.filter(|s| !s.is_empty()),
        query.office2.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::bad_request(
            "Both office1 and office2 parameters required",
        ));
    };

    let inventory = state.inventory.load().await?;
    let (Some(a), Some(b)) = (inventory.office(&id1), inventory.office(&id2)) else {
        return Err(ApiError::not_found("One or both offices not found"));
    };

    Ok(Json(DistanceResponse {
        office1: OfficeRef::from(a),
        office2: OfficeRef::from(b),
        distance_km: haversine_km(a.latitude, a.longitude, b.latitude, b.longitude),
    }))
}

/// 国家网络连通性 (合成)
#[utoipa::path(
    get,
    path = "/api/v1/external/connectivity/{code}",
    tag = "外部数据 (External)",
    params(
        ("code" = String, Path, description = "国家代码")
    ),
    responses(
        (status = 200, description = "连通性指标", body = Connectivity)
    )
)]
pub async fn get_connectivity(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Json<Connectivity> {
    Json(state.external.connectivity(&code))
}

/// 最新头条
#[utoipa::path(
    get,
    path = "/api/v1/external/news",
    tag = "外部数据 (External)",
    params(
        ("language" = Option<String>, Query, description = "语言，默认 en"),
        ("limit" = Option<usize>, Query, description = "条数，1~20，默认 5")
    ),
    responses(
        (status = 200, description = "头条列表", body = NewsResponse),
        (status = 400, description = "limit 不是数字")
    )
)]
pub async fn get_news(
    State(state): State<AppState>,
    Query(query): Query<NewsQuery>,
) -> Result<Json<NewsResponse>, ApiError> {
    let language = query
        .language
        .filter(|l| !l.trim().is_empty())
        .unwrap_or_else(|| "en".to_string());
    let limit = parse_param(
        query.limit.as_deref(),
        DEFAULT_NEWS_ITEMS,
        "Invalid limit parameter - must be a number",
    )?
    .clamp(1, MAX_NEWS_ITEMS);
    let limit = usize::try_from(limit).unwrap_or(1);

    Ok(Json(NewsResponse {
        news: state.external.headlines(&language, limit).await,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_code_shape() {
        assert!(valid_country_code("KE"));
        assert!(valid_country_code("ken"));
        assert!(!valid_country_code("K"));
        assert!(!valid_country_code("KENY"));
        assert!(!valid_country_code("K1"));
    }
}
