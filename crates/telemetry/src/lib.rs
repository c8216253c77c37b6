//! # `ictdash-telemetry` - 模拟遥测与分析
//!
//! 设备指标、告警、区域统计与健康评分均为随机模拟数据，
//! 只有清单结构 (办公室、设备、区域归属) 来自真实的种子数据。

pub mod analytics;
pub mod model;
pub mod report;
pub mod simulator;
