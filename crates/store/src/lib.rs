//! # `ictdash-store` - 文件存储
//!
//! 种子清单 (`seed_data.json`) 的只读加载与分析报告的 JSON 文件持久化。

pub mod inventory;
pub mod report;
