//! # API 统一错误处理
//!
//! 将下层各 crate 的错误类型统一映射到 HTTP 状态码与 JSON 响应体。
//! 响应体形如 `{"error": "...", ...附加上下文}`。

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use ictdash_core::store::error::StoreError;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// 客户端可见的错误信息与附加上下文
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub message: String,
    pub context: Map<String, Value>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Map::new(),
        }
    }

    fn to_json(&self) -> Value {
        let mut body = self.context.clone();
        body.insert("error".to_string(), Value::String(self.message.clone()));
        Value::Object(body)
    }
}

/// API 层统一错误枚举
#[derive(Error, Debug)]
pub enum ApiError {
    /// 请求参数错误 (400)
    #[error("Bad request: {}", .0.message)]
    BadRequest(ErrorBody),

    /// 资源未找到 (404)
    #[error("Not found: {}", .0.message)]
    NotFound(ErrorBody),

    /// 下层业务错误 (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(ErrorBody::new(message))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(ErrorBody::new(message))
    }

    /// # Summary
    /// 为 400/404 响应体追加一个上下文字段，如 `available_regions`。
    ///
    /// # Invariants
    /// - `Internal` 不携带上下文，调用无效果。
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        match &mut self {
            ApiError::BadRequest(body) | ApiError::NotFound(body) => {
                body.context.insert(key.to_string(), value.into());
            }
            ApiError::Internal(_) => {}
        }
        self
    }
}

/// 将 `ApiError` 转换为 axum 的 HTTP 响应
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(body) => (StatusCode::BAD_REQUEST, Json(body.to_json())).into_response(),
            ApiError::NotFound(body) => (StatusCode::NOT_FOUND, Json(body.to_json())).into_response(),
            ApiError::Internal(detail) => {
                // 内部错误只记录日志，不向客户端透传细节
                tracing::error!("Internal server error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error",
                        "message": "An unexpected error occurred",
                        "status": 500
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// 从 `StoreError` 转换
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// 未匹配任何路由时的响应
pub async fn not_found_fallback() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "message": "The requested resource was not found",
            "status": 404
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_is_merged_into_body() {
        let err = ApiError::not_found("Region not found or has no data")
            .with("available_regions", vec!["Africa", "Europe-CIS"]);
        let ApiError::NotFound(body) = err else {
            panic!("expected NotFound");
        };
        let json = body.to_json();
        assert_eq!(json["error"], "Region not found or has no data");
        assert_eq!(json["available_regions"][1], "Europe-CIS");
    }

    #[test]
    fn test_internal_ignores_context() {
        let err = ApiError::Internal("disk".into()).with("host", "x");
        assert!(matches!(err, ApiError::Internal(ref d) if d == "disk"));
    }
}
