use crate::http::{build_client, get_json, trim_base};
use async_trait::async_trait;
use ictdash_core::common::time::{TimeProvider, rfc3339};
use ictdash_core::external::entity::IpLocation;
use ictdash_core::external::error::FeedError;
use ictdash_core::external::port::IpLocationSource;
use reqwest::Client;
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

/// ip-api.com 定位接口
pub struct IpApiClient {
    client: Client,
    base_url: String,
    clock: Arc<dyn TimeProvider>,
}

impl IpApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self, FeedError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base(base_url),
            clock,
        })
    }
}

// 失败响应只带 status 与 message，其余字段缺省
#[derive(Deserialize, Debug, Default)]
#[serde(default, rename_all = "camelCase")]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    country: String,
    country_code: String,
    region_name: String,
    city: String,
    lat: f64,
    lon: f64,
    timezone: String,
    isp: String,
}

#[async_trait]
impl IpLocationSource for IpApiClient {
    /// # Logic
    /// 1. 请求 `{base}/{ip}`。
    /// 2. `status != "success"` 视为上游无数据。
    async fn locate(&self, ip: IpAddr) -> Result<IpLocation, FeedError> {
        let url = format!("{}/{}", self.base_url, ip);
        let body: IpApiResponse = get_json(self.client.get(&url)).await?;

        if body.status != "success" {
            return Err(FeedError::NoData(
                body.message.unwrap_or_else(|| body.status.clone()),
            ));
        }

        Ok(IpLocation {
            ip: ip.to_string(),
            country: body.country,
            country_code: body.country_code,
            region: body.region_name,
            city: body.city,
            latitude: body.lat,
            longitude: body.lon,
            timezone: body.timezone,
            isp: body.isp,
            timestamp: rfc3339(self.clock.now()),
            source: None,
        })
    }
}
