use crate::http::{build_client, get_json, trim_base};
use async_trait::async_trait;
use ictdash_core::common::time::{TimeProvider, rfc3339};
use ictdash_core::external::entity::CountryInfo;
use ictdash_core::external::error::FeedError;
use ictdash_core::external::port::CountrySource;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// REST Countries v3.1 (`/alpha/{code}`)
pub struct RestCountriesClient {
    client: Client,
    base_url: String,
    clock: Arc<dyn TimeProvider>,
}

impl RestCountriesClient {
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

#[derive(Deserialize, Debug)]
struct RcCountry {
    name: RcName,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    region: String,
    subregion: Option<String>,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    languages: Map<String, Value>,
    #[serde(default)]
    currencies: Map<String, Value>,
    #[serde(default)]
    timezones: Vec<String>,
    flags: RcFlags,
}

#[derive(Deserialize, Debug)]
struct RcName {
    common: String,
    official: String,
}

#[derive(Deserialize, Debug)]
struct RcFlags {
    #[serde(default)]
    png: String,
}

impl RcCountry {
    fn into_info(self, timestamp: String) -> CountryInfo {
        let c = self;
        CountryInfo {
            name: c.name.common,
            official_name: c.name.official,
            capital: c
                .capital
                .into_iter()
                .next()
                .unwrap_or_else(|| "N/A".to_string()),
            region: c.region,
            subregion: c.subregion.unwrap_or_else(|| "N/A".to_string()),
            population: c.population,
            // 语言取名称，货币取 ISO 代码
            languages: c
                .languages
                .into_iter()
                .filter_map(|(_, v)| v.as_str().map(str::to_string))
                .collect(),
            currencies: c.currencies.into_iter().map(|(k, _)| k).collect(),
            timezones: c.timezones,
            flag: c.flags.png,
            timestamp,
            source: None,
        }
    }
}

#[async_trait]
impl CountrySource for RestCountriesClient {
    async fn country(&self, code: &str) -> Result<CountryInfo, FeedError> {
        let url = format!("{}/alpha/{}", self.base_url, code);
        let body: Vec<RcCountry> = get_json(self.client.get(&url)).await?;
        body.into_iter()
            .next()
            .map(|c| c.into_info(rfc3339(self.clock.now())))
            .ok_or_else(|| FeedError::NoData(format!("no country for {}", code)))
    }
}
