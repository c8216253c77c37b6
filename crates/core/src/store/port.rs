use super::error::StoreError;
use crate::inventory::entity::Inventory;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// # Summary
/// 已生成的分析报告。
///
/// # Invariants
/// - `id` 形如 `RPT-YYYYmmddHHMMSS`，同一秒内生成的报告会相互覆盖。
/// - 各分节内容由分析服务产出，存储层只做透明的 JSON 读写。
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Report {
    // 报告唯一标识
    #[schema(example = "RPT-20260301120000")]
    pub id: String,
    // 报告类型 (summary 等自由文本)
    #[serde(rename = "type")]
    #[schema(example = "summary")]
    pub kind: String,
    // 生成时间 (RFC 3339)
    pub generated_at: String,
    // 发起人
    #[schema(example = "system")]
    pub generated_by: String,
    // 全局概览
    #[schema(value_type = Object)]
    pub summary: Value,
    // 7 日趋势 (可选)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub trends: Option<Value>,
    // 最近告警 (可选)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub alerts: Option<Value>,
    // 健康评分
    #[schema(value_type = Object)]
    pub health_score: Value,
    // 设备类型分布
    #[schema(value_type = Object)]
    pub device_distribution: Value,
}

/// # Summary
/// 办公室/设备清单的只读数据源。
///
/// # Invariants
/// - 每次调用都反映数据源的当前内容，实现者不得跨调用缓存过期数据。
/// - 数据源缺失时返回空清单而不是错误。
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// # Summary
    /// 读取完整清单。
    ///
    /// # Returns
    /// 成功返回 `Inventory`，底层读取故障返回 `StoreError`。
    async fn load(&self) -> Result<Inventory, StoreError>;
}

/// # Summary
/// 分析报告的持久化接口。
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// # Summary
    /// 保存报告，同 ID 覆盖。
    async fn save(&self, report: &Report) -> Result<(), StoreError>;

    /// # Summary
    /// 按 ID 读取报告，不存在返回 `None`。
    async fn get(&self, id: &str) -> Result<Option<Report>, StoreError>;

    /// # Summary
    /// 列出全部报告，按生成时间倒序。
    async fn list(&self) -> Result<Vec<Report>, StoreError>;
}
