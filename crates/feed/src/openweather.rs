use crate::http::{build_client, get_json, trim_base};
use async_trait::async_trait;
use ictdash_core::common::time::{TimeProvider, rfc3339};
use ictdash_core::external::entity::Weather;
use ictdash_core::external::error::FeedError;
use ictdash_core::external::port::WeatherSource;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

/// # Summary
/// OpenWeatherMap 当前天气接口 (`/weather`，公制单位)。
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    clock: Arc<dyn TimeProvider>,
}

impl OpenWeatherClient {
    pub fn new(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
        clock: Arc<dyn TimeProvider>,
    ) -> Result<Self, FeedError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: trim_base(base_url),
            api_key: api_key.to_string(),
            clock,
        })
    }
}

#[derive(Deserialize, Debug)]
struct OwmResponse {
    main: OwmMain,
    weather: Vec<OwmCondition>,
    wind: OwmWind,
    clouds: OwmClouds,
}

#[derive(Deserialize, Debug)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: i64,
    pressure: i64,
}

#[derive(Deserialize, Debug)]
struct OwmCondition {
    description: String,
    icon: String,
}

#[derive(Deserialize, Debug)]
struct OwmWind {
    speed: f64,
}

#[derive(Deserialize, Debug)]
struct OwmClouds {
    all: i64,
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Weather, FeedError> {
        let url = format!("{}/weather", self.base_url);
        let body: OwmResponse = get_json(self.client.get(&url).query(&[
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("appid", self.api_key.clone()),
            ("units", "metric".to_string()),
        ]))
        .await?;

        let condition = body
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| FeedError::Parse("empty weather array".into()))?;

        Ok(Weather {
            temperature: body.main.temp,
            feels_like: body.main.feels_like,
            humidity: body.main.humidity,
            pressure: body.main.pressure,
            description: condition.description,
            icon: condition.icon,
            wind_speed: body.wind.speed,
            clouds: body.clouds.all,
            timestamp: rfc3339(self.clock.now()),
            source: None,
        })
    }
}
