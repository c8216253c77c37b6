//! # 路由控制器
//!
//! 每个子模块对应 `/api/v1` 下的一组资源。查询参数一律先按字符串接收，
//! 再由处理器解析，以便对非法输入返回带说明的 400。

pub mod analytics;
pub mod devices;
pub mod external;
pub mod offices;
pub mod snmp;
pub mod system;

use crate::error::ApiError;
use ictdash_core::inventory::entity::Office;
use serde::de::DeserializeOwned;
use std::str::FromStr;

/// # Summary
/// 解析可选的数字查询参数。
///
/// # Logic
/// 缺省或空串取 `default`；无法解析时返回 `BadRequest(message)`。
pub(crate) fn parse_param<T: FromStr>(
    raw: Option<&str>,
    default: T,
    message: &str,
) -> Result<T, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s.parse().map_err(|_| ApiError::bad_request(message)),
    }
}

/// 解析 JSON 请求体；空请求体视为默认值
pub(crate) fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        tracing::debug!("Rejected request body: {}", e);
        ApiError::bad_request("Invalid JSON body")
    })
}

pub(crate) fn office_not_found() -> ApiError {
    ApiError::not_found("Office not found")
}

pub(crate) fn find_office<'a>(offices: &'a [Office], id: &str) -> Result<&'a Office, ApiError> {
    offices.iter().find(|o| o.id == id).ok_or_else(office_not_found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param::<u32>(None, 24, "bad").unwrap(), 24);
        assert_eq!(parse_param::<u32>(Some(" "), 24, "bad").unwrap(), 24);
        assert_eq!(parse_param::<u32>(Some("48"), 24, "bad").unwrap(), 48);
        assert!(matches!(
            parse_param::<u32>(Some("abc"), 24, "bad"),
            Err(ApiError::BadRequest(b)) if b.message == "bad"
        ));
        assert!(parse_param::<i64>(Some("-3"), 7, "bad").is_ok());
    }

    #[test]
    fn test_parse_body_defaults_on_empty() {
        let req: crate::types::DiscoverRequest = parse_body(b"").unwrap();
        assert!(req.network.is_none());
        assert!(parse_body::<crate::types::DiscoverRequest>(b"{oops").is_err());
    }
}
