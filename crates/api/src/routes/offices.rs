//! # 办公室路由控制器
//!
//! 实现 `/api/v1/offices` 路径下的 REST 接口。清单每次请求都从存储重新加载。

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::{find_office, parse_body};
use crate::server::AppState;
use crate::types::{
    CreateOfficeRequest, CreateOfficeResponse, DeviceResponse, OfficeDevicesResponse,
    OfficeListResponse, OfficeResponse,
};
use ictdash_core::inventory::entity::Office;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct OfficeFilter {
    pub region: Option<String>,
    pub status: Option<String>,
}

/// 列出办公室
///
/// `region` 与 `status` 为精确匹配过滤。
#[utoipa::path(
    get,
    path = "/api/v1/offices",
    tag = "办公室 (Offices)",
    params(
        ("region" = Option<String>, Query, description = "大区，如 Africa"),
        ("status" = Option<String>, Query, description = "办公室状态，如 active")
    ),
    responses(
        (status = 200, description = "办公室列表", body = OfficeListResponse)
    )
)]
pub async fn list_offices(
    State(state): State<AppState>,
    Query(filter): Query<OfficeFilter>,
) -> Result<Json<OfficeListResponse>, ApiError> {
    let inventory = state.inventory.load().await?;
    let offices: Vec<OfficeResponse> = inventory
        .offices
        .iter()
        .filter(|o| filter.region.as_deref().is_none_or(|r| o.region == r))
        .filter(|o| filter.status.as_deref().is_none_or(|s| o.status == s))
        .map(OfficeResponse::from)
        .collect();

    Ok(Json(OfficeListResponse {
        total: offices.len(),
        offices,
    }))
}

/// 获取单个办公室
#[utoipa::path(
    get,
    path = "/api/v1/offices/{id}",
    tag = "办公室 (Offices)",
    params(
        ("id" = String, Path, description = "办公室 ID")
    ),
    responses(
        (status = 200, description = "办公室详情", body = OfficeResponse),
        (status = 404, description = "办公室不存在")
    )
)]
pub async fn get_office(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OfficeResponse>, ApiError> {
    let inventory = state.inventory.load().await?;
    let office = find_office(&inventory.offices, &id)?;
    Ok(Json(OfficeResponse::from(office)))
}

/// 列出办公室下的设备
#[utoipa::path(
    get,
    path = "/api/v1/offices/{id}/devices",
    tag = "办公室 (Offices)",
    params(
        ("id" = String, Path, description = "办公室 ID")
    ),
    responses(
        (status = 200, description = "设备列表", body = OfficeDevicesResponse),
        (status = 404, description = "办公室不存在")
    )
)]
pub async fn get_office_devices(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OfficeDevicesResponse>, ApiError> {
    let inventory = state.inventory.load().await?;
    let office = find_office(&inventory.offices, &id)?;
    let devices: Vec<DeviceResponse> = inventory.devices_of(&id).map(DeviceResponse::from).collect();

    Ok(Json(OfficeDevicesResponse {
        office_id: id.clone(),
        office_name: office.name.clone(),
        total_devices: devices.len(),
        devices,
    }))
}

/// 新建办公室
///
/// 校验必填字段并分配 ID，结果只回显不落盘。
#[utoipa::path(
    post,
    path = "/api/v1/offices",
    tag = "办公室 (Offices)",
    request_body = CreateOfficeRequest,
    responses(
        (status = 201, description = "创建成功", body = CreateOfficeResponse),
        (status = 400, description = "缺少必填字段")
    )
)]
pub async fn create_office(body: Bytes) -> Result<(StatusCode, Json<CreateOfficeResponse>), ApiError> {
    let req: CreateOfficeRequest = parse_body(&body)?;
    let office = office_from_request(req, &new_office_suffix())?;
    tracing::info!("Office {} created (not persisted)", office.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateOfficeResponse {
            message: "Office created successfully".to_string(),
            office: OfficeResponse::from(&office),
        }),
    ))
}

/// 三位大写十六进制随机后缀
fn new_office_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..3].to_ascii_uppercase()
}

/// # Summary
/// 由请求构造办公室。
///
/// # Logic
/// 1. name、country、region、city、latitude、longitude 任一缺失返回 400。
/// 2. ID 为 `CO-<大区前两个字符大写>-<suffix>`。
/// 3. 时区缺省 `UTC`，状态缺省 `active`。
fn office_from_request(req: CreateOfficeRequest, suffix: &str) -> Result<Office, ApiError> {
    let (Some(name), Some(country), Some(region), Some(city), Some(latitude), Some(longitude)) = (
        req.name,
        req.country,
        req.region,
        req.city,
        req.latitude,
        req.longitude,
    ) else {
        return Err(ApiError::bad_request("Missing required fields"));
    };

    let region_code: String = region.chars().take(2).collect::<String>().to_uppercase();
    Ok(Office {
        id: format!("CO-{}-{}", region_code, suffix),
        name,
        country,
        region,
        city,
        latitude,
        longitude,
        timezone: req.timezone.unwrap_or_else(|| "UTC".to_string()),
        status: req.status.unwrap_or_else(|| "active".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateOfficeRequest {
        CreateOfficeRequest {
            name: Some("UNDP Fiji".into()),
            country: Some("Fiji".into()),
            region: Some("Asia-Pacific".into()),
            city: Some("Suva".into()),
            latitude: Some(-18.14),
            longitude: Some(178.44),
            ..Default::default()
        }
    }

    #[test]
    fn test_office_id_and_defaults() {
        let office = office_from_request(request(), "A1F").unwrap();
        assert_eq!(office.id, "CO-AS-A1F");
        assert_eq!(office.timezone, "UTC");
        assert_eq!(office.status, "active");
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut req = request();
        req.longitude = None;
        assert!(matches!(
            office_from_request(req, "000"),
            Err(ApiError::BadRequest(b)) if b.message == "Missing required fields"
        ));
    }

    #[test]
    fn test_suffix_shape() {
        let suffix = new_office_suffix();
        assert_eq!(suffix.len(), 3);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }
}
