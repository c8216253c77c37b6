use crate::analytics::AnalyticsService;
use ictdash_core::common::time::{TimeProvider, rfc3339};
use ictdash_core::store::error::StoreError;
use ictdash_core::store::port::{Report, ReportStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

// 报告内嵌的告警条数
const REPORT_ALERT_LIMIT: usize = 20;
// 报告内嵌的趋势天数
const REPORT_TREND_DAYS: u32 = 7;

/// 生成报告的请求参数，缺省字段取默认值
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ReportRequest {
    #[serde(rename = "type")]
    #[schema(example = "summary")]
    pub kind: String,
    #[schema(example = "system")]
    pub user: String,
    pub include_trends: bool,
    pub include_alerts: bool,
}

impl Default for ReportRequest {
    fn default() -> Self {
        Self {
            kind: "summary".to_string(),
            user: "system".to_string(),
            include_trends: true,
            include_alerts: true,
        }
    }
}

/// # Summary
/// 报告服务：把分析结果汇总成快照并持久化。
pub struct ReportService {
    analytics: Arc<AnalyticsService>,
    store: Arc<dyn ReportStore>,
    clock: Arc<dyn TimeProvider>,
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Format(e.to_string()))
}

impl ReportService {
    pub fn new(
        analytics: Arc<AnalyticsService>,
        store: Arc<dyn ReportStore>,
        clock: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            analytics,
            store,
            clock,
        }
    }

    /// # Summary
    /// 生成并保存一份报告。
    ///
    /// # Logic
    /// 1. 以当前时间生成 `RPT-YYYYmmddHHMMSS` 编号 (同一秒内的报告互相覆盖)。
    /// 2. 汇总全局概览、健康评分、设备分布，按需附带 7 日趋势与最近 20 条告警。
    /// 3. 写入报告存储。
    pub async fn generate(&self, request: &ReportRequest) -> Result<Report, StoreError> {
        let now = self.clock.now();
        let id = format!("RPT-{}", now.format("%Y%m%d%H%M%S"));

        let trends = if request.include_trends {
            Some(to_value(&self.analytics.trends(REPORT_TREND_DAYS).await?)?)
        } else {
            None
        };
        let alerts = if request.include_alerts {
            Some(to_value(
                &self.analytics.alerts(None, REPORT_ALERT_LIMIT).await?,
            )?)
        } else {
            None
        };

        let report = Report {
            id,
            kind: request.kind.clone(),
            generated_at: rfc3339(now),
            generated_by: request.user.clone(),
            summary: to_value(&self.analytics.summary().await?)?,
            trends,
            alerts,
            health_score: to_value(&self.analytics.health_score().await?)?,
            device_distribution: to_value(&self.analytics.distribution().await?)?,
        };

        self.store.save(&report).await?;
        tracing::info!("Generated report {} for {}", report.id, report.generated_by);
        Ok(report)
    }

    pub async fn get(&self, id: &str) -> Result<Option<Report>, StoreError> {
        self.store.get(id).await
    }

    /// 全部报告，新的在前
    pub async fn list(&self) -> Result<Vec<Report>, StoreError> {
        self.store.list().await
    }
}
