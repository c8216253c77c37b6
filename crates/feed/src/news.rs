use crate::http::{build_client, get_json, trim_base};
use async_trait::async_trait;
use ictdash_core::common::time::{TimeProvider, rfc3339};
use ictdash_core::external::entity::NewsArticle;
use ictdash_core::external::error::FeedError;
use ictdash_core::external::port::NewsSource;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// # Summary
/// TheNewsAPI 头条接口。
///
/// # Invariants
/// - 只在配置了 API token 时构造，空 token 由调用方拦截。
pub struct TheNewsApiClient {
    client: Client,
    base_url: String,
    api_token: String,
    clock: Arc<dyn TimeProvider>,
}

impl TheNewsApiClient {
    pub fn new(
        base_url: &str,
        api_token: &str,
        timeout: Duration,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self, FeedError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base(base_url),
            api_token: api_token.to_string(),
            clock,
        })
    }
}

#[derive(Deserialize, Debug)]
struct NewsResponse {
    data: Option<Vec<NewsItem>>,
}

#[derive(Deserialize, Debug)]
struct NewsItem {
    title: Option<String>,
    source: Option<String>,
    url: Option<String>,
    published_at: Option<String>,
}

#[async_trait]
impl NewsSource for TheNewsApiClient {
    /// # Logic
    /// 1. 缺少 `data` 字段视为响应格式错误。
    /// 2. 缺失的字段分别取 `Untitled` / `Unknown` / `#` / 当前时间。
    /// 3. 截断到 `max_items` 条。
    async fn headlines(
        &self,
        language: &str,
        max_items: usize,
    ) -> Result<Vec<NewsArticle>, FeedError> {
        let body: NewsResponse = get_json(self.client.get(&self.base_url).query(&[
            ("api_token", self.api_token.clone()),
            ("language", language.to_string()),
            ("headlines_per_category", max_items.to_string()),
            ("include_similar", "false".to_string()),
        ]))
        .await?;

        let items = body
            .data
            .ok_or_else(|| FeedError::Parse("missing data field".into()))?;
        let now = rfc3339(self.clock.now());

        Ok(items
            .into_iter()
            .take(max_items)
            .map(|item| NewsArticle {
                title: item.title.unwrap_or_else(|| "Untitled".to_string()),
                source: item.source.unwrap_or_else(|| "Unknown".to_string()),
                url: item.url.unwrap_or_else(|| "#".to_string()),
                published_at: item.published_at.unwrap_or_else(|| now.clone()),
            })
            .collect())
    }
}
