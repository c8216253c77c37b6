use ictdash_core::external::error::FeedError;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// 构建带整体超时的 HTTP 客户端
pub(crate) fn build_client(timeout: Duration) -> Result<Client, FeedError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("ictdash/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| FeedError::Network(e.to_string()))
}

/// # Summary
/// 发送请求并把 2xx 响应体解析为 `T`。
///
/// # Logic
/// 1. 发送失败 (连接、超时) 映射为 `Network`。
/// 2. 非 2xx 映射为 `Status`。
/// 3. 响应体无法解析映射为 `Parse`。
pub(crate) async fn get_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FeedError> {
    let resp = request
        .send()
        .await
        .map_err(|e| FeedError::Network(e.to_string()))?;

    if !resp.status().is_success() {
        return Err(FeedError::Status(resp.status().as_u16()));
    }

    resp.json::<T>()
        .await
        .map_err(|e| FeedError::Parse(e.to_string()))
}

/// 去掉基础地址末尾的 `/`，便于拼接路径
pub(crate) fn trim_base(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
