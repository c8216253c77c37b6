use crate::model::{
    Alert, AlertCounts, AlertFeed, DeviceDistribution, GlobalHealth, GlobalSummary,
    HealthComponents, HealthScore, PerformanceMetrics, PerformanceTrends, Performer, Priority,
    Recommendation, RegionAnalytics, RegionBreakdown, RegionOffice, RegionPerformance,
    RegionSummary, TrendPoint, TypeShare,
};
use chrono::{DateTime, Duration, Timelike, Utc};
use ictdash_core::common::time::TimeProvider;
use ictdash_core::common::{percentage, ratio, round_to, scaled_count};
use ictdash_core::inventory::entity::Inventory;
use ictdash_core::store::error::StoreError;
use ictdash_core::store::port::InventoryStore;
use ictdash_core::telemetry::entity::Severity;
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use std::sync::Arc;

/// 种子数据覆盖的大区，区域查询失败时提示给调用方
pub const KNOWN_REGIONS: [&str; 4] = ["Africa", "Asia-Pacific", "Europe-CIS", "Latin America"];

const ALERT_TYPES: [&str; 12] = [
    "High CPU Usage",
    "Memory Threshold Exceeded",
    "Device Offline",
    "High Temperature",
    "Packet Loss Detected",
    "Interface Down",
    "Configuration Changed",
    "Security Event",
    "Backup Failed",
    "License Expiring",
    "Disk Space Low",
    "Fan Speed Warning",
];

// critical / warning / info 的抽样权重
const SEVERITY_WEIGHTS: [u32; 3] = [10, 30, 60];

// 8:00 到 18:00 (含) 视为业务时段
const BUSINESS_HOURS: std::ops::RangeInclusive<u32> = 8..=18;

/// # Summary
/// 全局分析服务。
///
/// # Invariants
/// * 每个操作都重新加载清单，统计结构来自清单，数值部分为随机模拟。
/// * 指向不存在办公室的设备不参与按办公室或区域的统计。
pub struct AnalyticsService {
    inventory: Arc<dyn InventoryStore>,
    clock: Arc<dyn TimeProvider>,
}

impl AnalyticsService {
    pub fn new(inventory: Arc<dyn InventoryStore>, clock: Arc<dyn TimeProvider>) -> Self {
        Self { inventory, clock }
    }

    pub async fn summary(&self) -> Result<GlobalSummary, StoreError> {
        let inventory = self.inventory.load().await?;
        Ok(global_summary(
            &mut rand::thread_rng(),
            &inventory,
            self.clock.now(),
        ))
    }

    /// 大区统计，区域内没有办公室时返回 `None`
    pub async fn region(&self, region: &str) -> Result<Option<RegionAnalytics>, StoreError> {
        let inventory = self.inventory.load().await?;
        Ok(region_analytics(&mut rand::thread_rng(), &inventory, region))
    }

    pub async fn alerts(
        &self,
        severity: Option<Severity>,
        limit: usize,
    ) -> Result<AlertFeed, StoreError> {
        let inventory = self.inventory.load().await?;
        Ok(alert_feed(
            &mut rand::thread_rng(),
            &inventory,
            severity,
            limit,
            self.clock.now(),
        ))
    }

    pub async fn trends(&self, days: u32) -> Result<PerformanceTrends, StoreError> {
        let inventory = self.inventory.load().await?;
        Ok(performance_trends(
            &mut rand::thread_rng(),
            &inventory,
            days,
            self.clock.now(),
        ))
    }

    pub async fn top_performers(&self, limit: usize) -> Result<Vec<Performer>, StoreError> {
        let inventory = self.inventory.load().await?;
        Ok(top_performers(&mut rand::thread_rng(), &inventory, limit))
    }

    pub async fn distribution(&self) -> Result<DeviceDistribution, StoreError> {
        let inventory = self.inventory.load().await?;
        Ok(device_distribution(&inventory))
    }

    /// 基于一次新的全局概览计算健康评分
    pub async fn health_score(&self) -> Result<HealthScore, StoreError> {
        let summary = self.summary().await?;
        Ok(health_score(&summary, self.clock.now()))
    }
}

/// # Summary
/// 生成全局概览。
///
/// # Logic
/// 1. 在线设备数取总数的 90%~98%，在运营办公室取 95%~100%，均向下取整。
/// 2. 按办公室首次出现的顺序汇总各大区的办公室数与设备数。
/// 3. 告警计数与性能均值为区间内随机值。
pub fn global_summary<R: Rng + ?Sized>(
    rng: &mut R,
    inventory: &Inventory,
    now: DateTime<Utc>,
) -> GlobalSummary {
    let total_devices = inventory.devices.len();
    let online_devices = scaled_count(total_devices, rng.gen_range(0.90..=0.98));
    let total_offices = inventory.offices.len();
    let active_offices = scaled_count(total_offices, rng.gen_range(0.95..=1.0));

    let mut regions: Vec<(String, usize, usize)> = Vec::new();
    for office in &inventory.offices {
        match regions.iter_mut().find(|(r, _, _)| *r == office.region) {
            Some(entry) => entry.1 += 1,
            None => regions.push((office.region.clone(), 1, 0)),
        }
    }
    for device in &inventory.devices {
        let Some(office) = inventory.office(&device.office_id) else {
            continue;
        };
        if let Some(entry) = regions.iter_mut().find(|(r, _, _)| *r == office.region) {
            entry.2 += 1;
        }
    }

    let critical = rng.gen_range(0..=5);
    let warning = rng.gen_range(5..=20);
    let info = rng.gen_range(10..=50);

    GlobalSummary {
        timestamp: now,
        global_health: GlobalHealth {
            total_offices,
            active_offices,
            office_health: percentage(active_offices, total_offices),
            total_devices,
            online_devices,
            device_health: percentage(online_devices, total_devices),
        },
        performance_metrics: PerformanceMetrics {
            average_uptime_pct: round_to(rng.gen_range(98.0..=99.9), 2),
            average_response_time_ms: round_to(rng.gen_range(20.0..=80.0), 1),
            average_cpu_usage_pct: round_to(rng.gen_range(30.0..=60.0), 1),
            average_memory_usage_pct: round_to(rng.gen_range(40.0..=70.0), 1),
        },
        alerts: AlertCounts {
            critical,
            warning,
            info,
            total: critical + warning + info,
        },
        regional_breakdown: regions
            .into_iter()
            .map(|(region, offices, devices)| RegionBreakdown {
                region,
                offices,
                devices,
                health_score: round_to(rng.gen_range(85.0..=98.0), 1),
            })
            .collect(),
    }
}

/// 单个大区的统计，大区名大小写敏感
pub fn region_analytics<R: Rng + ?Sized>(
    rng: &mut R,
    inventory: &Inventory,
    region: &str,
) -> Option<RegionAnalytics> {
    let offices: Vec<_> = inventory
        .offices
        .iter()
        .filter(|o| o.region == region)
        .collect();
    if offices.is_empty() {
        return None;
    }

    let device_counts: Vec<usize> = offices
        .iter()
        .map(|o| inventory.devices_of(&o.id).count())
        .collect();
    let total_devices: usize = device_counts.iter().sum();
    let online_devices = scaled_count(total_devices, rng.gen_range(0.90..=0.98));

    Some(RegionAnalytics {
        region: region.to_string(),
        summary: RegionSummary {
            total_offices: offices.len(),
            total_devices,
            online_devices,
            avg_devices_per_office: round_to(ratio(total_devices, offices.len()), 1),
        },
        performance: RegionPerformance {
            average_uptime_pct: round_to(rng.gen_range(95.0..=99.5), 2),
            average_latency_ms: round_to(rng.gen_range(30.0..=100.0), 1),
            packet_loss_pct: round_to(rng.gen_range(0.1..=2.0), 2),
        },
        offices: offices
            .iter()
            .zip(device_counts)
            .map(|(o, devices_count)| RegionOffice {
                id: o.id.clone(),
                name: o.name.clone(),
                country: o.country.clone(),
                city: o.city.clone(),
                status: "active".to_string(),
                health_score: round_to(rng.gen_range(85.0..=99.0), 1),
                devices_count,
            })
            .collect(),
    })
}

/// # Summary
/// 生成全局告警列表。
///
/// # Logic
/// 1. 尝试生成 `min(limit, 20~100)` 条告警，清单中没有设备时为空。
/// 2. 未指定级别时按 10/30/60 的权重抽取 critical/warning/info。
/// 3. 随机选取设备，其办公室不存在时跳过该条 (不补足)。
/// 4. 告警时间在 `now` 之前 0~72 小时加 0~59 分钟，按时间倒序排列。
pub fn alert_feed<R: Rng + ?Sized>(
    rng: &mut R,
    inventory: &Inventory,
    severity: Option<Severity>,
    limit: usize,
    now: DateTime<Utc>,
) -> AlertFeed {
    let attempts = limit.min(rng.gen_range(20..=100));
    let weights = WeightedIndex::new(SEVERITY_WEIGHTS).ok();

    let mut alerts = Vec::new();
    for i in 0..attempts {
        let alert_severity = match (severity, &weights) {
            (Some(s), _) => s,
            (None, Some(w)) => Severity::ALL[w.sample(rng)],
            (None, None) => Severity::Info,
        };
        let Some(device) = inventory.devices.choose(rng) else {
            break;
        };
        let Some(office) = inventory.office(&device.office_id) else {
            continue;
        };

        let age =
            Duration::hours(rng.gen_range(0..=72)) + Duration::minutes(rng.gen_range(0..=59));
        let kind = ALERT_TYPES.choose(rng).copied().unwrap_or_default();
        alerts.push(Alert {
            id: format!("ALERT-{:05}", i + 1),
            timestamp: now - age,
            severity: alert_severity,
            kind: kind.to_string(),
            device_id: device.id.clone(),
            device_name: device.name.clone(),
            office_id: office.id.clone(),
            office_name: office.name.clone(),
            country: office.country.clone(),
            message: format!("{} detected on {} at {}", kind, device.name, office.name),
            acknowledged: rng.gen_bool(0.25),
            resolved: rng.gen_bool(0.25),
        });
    }

    alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    alerts.truncate(limit);

    let count = |s: Severity| alerts.iter().filter(|a| a.severity == s).count();
    AlertFeed {
        total: alerts.len(),
        severity_filter: severity,
        critical_count: count(Severity::Critical),
        warning_count: count(Severity::Warning),
        info_count: count(Severity::Info),
        alerts,
    }
}

/// # Summary
/// 生成 `days * 24` 个逐小时趋势点。
///
/// # Logic
/// 1. 第 `i` 个点的时间为 `now - (total - i) h`。
/// 2. 业务时段 (UTC 8~18 点) CPU 基线 60、带宽基线 40，其余时段 45 / 20。
/// 3. 内存基线随时间从 50 线性爬升到 60。
/// 4. 在线设备数为总数减去至多 5% 的随机离线数。
pub fn performance_trends<R: Rng + ?Sized>(
    rng: &mut R,
    inventory: &Inventory,
    days: u32,
    now: DateTime<Utc>,
) -> PerformanceTrends {
    let total_hours = days.saturating_mul(24);
    let total_devices = inventory.devices.len();
    let max_offline = scaled_count(total_devices, 0.05);

    let trends: Vec<TrendPoint> = (0..total_hours)
        .map(|i| {
            let timestamp = now - Duration::hours(i64::from(total_hours - i));
            let business = BUSINESS_HOURS.contains(&timestamp.hour());

            let base_cpu = if business { 60.0 } else { 45.0 };
            let base_memory = 50.0 + f64::from(i) / f64::from(total_hours) * 10.0;
            let base_bandwidth = if business { 40.0 } else { 20.0 };
            let packet_loss = if rng.gen_bool(0.1) {
                rng.gen_range(0.0..=0.5)
            } else {
                rng.gen_range(0.0..=2.0)
            };

            TrendPoint {
                timestamp,
                avg_cpu_usage: round_to(base_cpu + rng.gen_range(-10.0..=10.0), 2),
                avg_memory_usage: round_to(base_memory + rng.gen_range(-5.0..=5.0), 2),
                avg_bandwidth_mbps: round_to(base_bandwidth + rng.gen_range(-10.0..=10.0), 2),
                avg_latency_ms: round_to(rng.gen_range(20.0..=80.0), 2),
                packet_loss_pct: round_to(packet_loss, 3),
                devices_online: total_devices - rng.gen_range(0..=max_offline),
            }
        })
        .collect();

    PerformanceTrends {
        period_days: days,
        data_points: trends.len(),
        start_time: trends.first().map(|t| t.timestamp),
        end_time: trends.last().map(|t| t.timestamp),
        trends,
    }
}

/// # Summary
/// 从随机抽取的 `min(2 * limit, 设备总数)` 台设备中选出综合得分最高的 `limit` 台。
pub fn top_performers<R: Rng + ?Sized>(
    rng: &mut R,
    inventory: &Inventory,
    limit: usize,
) -> Vec<Performer> {
    let sample_size = limit.saturating_mul(2).min(inventory.devices.len());
    let candidates: Vec<_> = inventory
        .devices
        .choose_multiple(rng, sample_size)
        .collect();

    let mut performers: Vec<Performer> = candidates
        .into_iter()
        .filter_map(|device| {
            let office = inventory.office(&device.office_id)?;
            let uptime = round_to(rng.gen_range(99.0..=99.99), 2);
            let reliability = round_to(rng.gen_range(95.0..=100.0), 1);
            Some(Performer {
                device_id: device.id.clone(),
                device_name: device.name.clone(),
                device_type: device.device_type.clone(),
                office_name: office.name.clone(),
                country: office.country.clone(),
                region: office.region.clone(),
                uptime_pct: uptime,
                avg_response_time_ms: round_to(rng.gen_range(5.0..=30.0), 2),
                reliability_score: reliability,
                combined_score: round_to((uptime + reliability) / 2.0, 2),
            })
        })
        .collect();

    performers.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    performers.truncate(limit);
    performers
}

/// 设备类型分布，按数量降序，数量相同时保持首次出现的顺序
pub fn device_distribution(inventory: &Inventory) -> DeviceDistribution {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for device in &inventory.devices {
        match counts.iter_mut().find(|(t, _)| *t == device.device_type) {
            Some(entry) => entry.1 += 1,
            None => counts.push((device.device_type.as_str(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let total = inventory.devices.len();
    let distribution: Vec<TypeShare> = counts
        .into_iter()
        .map(|(kind, count)| TypeShare {
            kind: capitalize(kind),
            count,
            percentage: percentage(count, total),
        })
        .collect();

    DeviceDistribution {
        total_devices: total,
        types_count: distribution.len(),
        distribution,
    }
}

/// 首字母大写、其余小写 (`access_point` -> `Access_point`)
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// # Summary
/// 计算健康评分。
///
/// # Logic
/// 1. `score = 0.4 * 设备健康度 + 0.3 * 办公室健康度 + 0.3 * 平均可用率`。
/// 2. ≥95 excellent，≥85 good，≥70 fair，其余 poor。
/// 3. 附带按优先级排序的运维建议。
pub fn health_score(summary: &GlobalSummary, now: DateTime<Utc>) -> HealthScore {
    let device_health = summary.global_health.device_health;
    let office_health = summary.global_health.office_health;
    let avg_uptime = summary.performance_metrics.average_uptime_pct;
    let score = device_health * 0.4 + office_health * 0.3 + avg_uptime * 0.3;

    let (status, color, icon) = if score >= 95.0 {
        ("excellent", "green", "🟢")
    } else if score >= 85.0 {
        ("good", "blue", "🔵")
    } else if score >= 70.0 {
        ("fair", "yellow", "🟡")
    } else {
        ("poor", "red", "🔴")
    };

    HealthScore {
        health_score: round_to(score, 2),
        status: status.to_string(),
        status_color: color.to_string(),
        status_icon: icon.to_string(),
        components: HealthComponents {
            device_health,
            office_health,
            avg_uptime,
        },
        recommendations: recommendations(summary),
        timestamp: now,
    }
}

fn recommendation(
    priority: Priority,
    category: &str,
    icon: &str,
    message: String,
    action: &str,
) -> Recommendation {
    Recommendation {
        priority,
        category: category.to_string(),
        icon: icon.to_string(),
        message,
        action: action.to_string(),
    }
}

/// 根据概览生成运维建议，没有问题时给出一条 info 建议
pub fn recommendations(summary: &GlobalSummary) -> Vec<Recommendation> {
    let health = &summary.global_health;
    let perf = &summary.performance_metrics;
    let mut recs = Vec::new();

    if summary.alerts.critical > 0 {
        recs.push(recommendation(
            Priority::High,
            "alerts",
            "🚨",
            format!(
                "{} critical alerts require immediate attention",
                summary.alerts.critical
            ),
            "Review and resolve critical alerts in the alerts panel",
        ));
    }
    if health.device_health < 95.0 {
        let offline = health.total_devices.saturating_sub(health.online_devices);
        recs.push(recommendation(
            Priority::Medium,
            "availability",
            "⚠️",
            format!("{} devices are offline and need investigation", offline),
            "Check device connectivity and perform diagnostics",
        ));
    }
    if perf.average_cpu_usage_pct > 70.0 {
        recs.push(recommendation(
            Priority::Medium,
            "performance",
            "📊",
            "High CPU usage detected across multiple devices".to_string(),
            "Consider capacity upgrade or load balancing",
        ));
    }
    if perf.average_memory_usage_pct > 75.0 {
        recs.push(recommendation(
            Priority::Medium,
            "performance",
            "💾",
            "High memory usage may impact performance".to_string(),
            "Review memory allocation and optimize applications",
        ));
    }
    if perf.average_response_time_ms > 100.0 {
        recs.push(recommendation(
            Priority::Low,
            "network",
            "🌐",
            "Network latency is higher than optimal".to_string(),
            "Investigate network connectivity and routing",
        ));
    }
    if recs.is_empty() {
        recs.push(recommendation(
            Priority::Info,
            "general",
            "✅",
            "System is operating normally - maintain current monitoring schedule".to_string(),
            "Continue regular monitoring and maintenance",
        ));
    }

    recs.sort_by_key(|r| r.priority);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("router"), "Router");
        assert_eq!(capitalize("access_point"), "Access_point");
        assert_eq!(capitalize("VPN"), "Vpn");
        assert_eq!(capitalize(""), "");
    }
}
