//! # `ictdash-api` - HTTP API 网关
//!
//! ICT 基础设施看板的 HTTP/REST 服务入口。
//! 使用 `axum` 构建路由与控制器，通过 `utoipa` 自动生成 OpenAPI 3.0 Swagger 文档。
//!
//! ## 架构职责
//! - 接收看板前端或脚本的 HTTP 请求，校验路径与查询参数
//! - 调用清单、遥测分析、外部数据与 SNMP 服务
//! - 将领域模型转换为 DTO 返回给前端

pub mod error;
pub mod routes;
pub mod server;
pub mod types;
