use crate::http::{build_client, get_json, trim_base};
use async_trait::async_trait;
use ictdash_core::external::entity::ZoneTime;
use ictdash_core::external::error::FeedError;
use ictdash_core::external::port::TimeSource;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// worldtimeapi.org 客户端
pub struct WorldTimeClient {
    client: Client,
    base_url: String,
}

impl WorldTimeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base(base_url),
        })
    }
}

#[derive(Deserialize, Debug)]
struct WtZone {
    datetime: String,
    utc_offset: String,
    day_of_week: u32,
    day_of_year: u32,
    week_number: u32,
}

#[async_trait]
impl TimeSource for WorldTimeClient {
    async fn zone_time(&self, timezone: &str) -> Result<ZoneTime, FeedError> {
        let url = format!("{}/timezone/{}", self.base_url, timezone);
        let body: WtZone = get_json(self.client.get(&url)).await?;
        Ok(ZoneTime {
            timezone: timezone.to_string(),
            datetime: body.datetime,
            utc_offset: body.utc_offset,
            day_of_week: body.day_of_week,
            day_of_year: body.day_of_year,
            week_number: body.week_number,
            source: None,
        })
    }

    async fn zone_names(&self) -> Result<Vec<String>, FeedError> {
        let url = format!("{}/timezone", self.base_url);
        get_json(self.client.get(&url)).await
    }
}
