//! # `ictdash-feed` - 第三方数据
//!
//! 天气、IP 定位、国家元数据、世界时间与新闻头条的 HTTP 适配器，
//! 以及统一处理缓存与合成数据回退的 [`external::ExternalData`]。

pub mod external;
mod http;
pub mod ip_api;
pub mod mock;
pub mod news;
pub mod openweather;
pub mod rest_countries;
pub mod world_time;
