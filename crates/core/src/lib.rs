//! # `ictdash-core` - 领域核心
//!
//! 定义办公室/设备清单、遥测、外部数据与 SNMP 轮询的领域实体，
//! 以及各基础设施适配器需要实现的端口 (Port) trait。
//! 本 crate 不包含任何 I/O 实现。

pub mod cache;
pub mod common;
pub mod config;
pub mod external;
pub mod inventory;
pub mod snmp;
pub mod store;
pub mod telemetry;

#[cfg(feature = "test-utils")]
pub mod testing;
