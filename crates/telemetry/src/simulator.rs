use chrono::{DateTime, Duration, Utc};
use ictdash_core::common::round_to;
use ictdash_core::common::time::TimeProvider;
use ictdash_core::inventory::entity::Device;
use ictdash_core::telemetry::entity::{
    DeviceAlert, DeviceMetrics, HealthEvaluation, HealthStatus, Severity,
};
use rand::Rng;
use rand::seq::SliceRandom;
use std::sync::Arc;

const CPU_WARN: f64 = 80.0;
const MEMORY_WARN: f64 = 85.0;
const TEMPERATURE_WARN: f64 = 60.0;
const PACKET_LOSS_WARN: f64 = 1.0;
// 达到此数量的告警项即判定为 critical
const CRITICAL_WARNINGS: usize = 3;

const DEVICE_ALERT_TYPES: [&str; 6] = [
    "High CPU Usage",
    "Memory Threshold Exceeded",
    "High Temperature",
    "Packet Loss Detected",
    "Interface Down",
    "Connection Timeout",
];

/// # Summary
/// 设备指标模拟器。所有读数都是在固定区间内的随机值。
pub struct MetricsSimulator {
    clock: Arc<dyn TimeProvider>,
}

impl MetricsSimulator {
    pub fn new(clock: Arc<dyn TimeProvider>) -> Self {
        Self { clock }
    }

    /// 当前时刻的一次采样
    pub fn current_metrics(&self) -> DeviceMetrics {
        sample_metrics(&mut rand::thread_rng(), self.clock.now())
    }

    /// # Summary
    /// 最近 `hours` 小时的逐小时采样。
    ///
    /// # Logic
    /// 第 `i` 个点的时间为 `now - (hours - i) h`，因此最旧的点在前、最后一个点距今 1 小时。
    pub fn metrics_history(&self, hours: u32) -> Vec<DeviceMetrics> {
        let now = self.clock.now();
        let mut rng = rand::thread_rng();
        (0..hours)
            .map(|i| sample_metrics(&mut rng, now - Duration::hours(i64::from(hours - i))))
            .collect()
    }

    /// # Summary
    /// 根据阈值评估一次采样的健康状态。
    ///
    /// # Logic
    /// 1. CPU > 80、内存 > 85、温度 > 60、丢包 > 1 各产生一条告警。
    /// 2. 无告警为 healthy；有告警为 warning；告警数 ≥ 3 为 critical。
    pub fn evaluate(metrics: &DeviceMetrics) -> HealthEvaluation {
        let checks = [
            (metrics.cpu_usage > CPU_WARN, "High CPU usage"),
            (metrics.memory_usage > MEMORY_WARN, "High memory usage"),
            (metrics.temperature > TEMPERATURE_WARN, "High temperature"),
            (metrics.packet_loss > PACKET_LOSS_WARN, "Packet loss detected"),
        ];
        let warnings: Vec<String> = checks
            .iter()
            .filter(|(hit, _)| *hit)
            .map(|(_, msg)| msg.to_string())
            .collect();

        let health_status = match warnings.len() {
            0 => HealthStatus::Healthy,
            n if n >= CRITICAL_WARNINGS => HealthStatus::Critical,
            _ => HealthStatus::Warning,
        };
        HealthEvaluation {
            health_status,
            warnings,
        }
    }

    /// 设备最近 72 小时内的模拟告警历史，新的在前
    pub fn device_alerts(&self, device: &Device) -> Vec<DeviceAlert> {
        simulate_device_alerts(&mut rand::thread_rng(), device, self.clock.now())
    }
}

/// 在 `timestamp` 时刻生成一组随机指标
pub fn sample_metrics<R: Rng + ?Sized>(rng: &mut R, timestamp: DateTime<Utc>) -> DeviceMetrics {
    DeviceMetrics {
        cpu_usage: round_to(rng.gen_range(10.0..=90.0), 2),
        memory_usage: round_to(rng.gen_range(20.0..=80.0), 2),
        bandwidth_in: round_to(rng.gen_range(0.5..=10.0), 2),
        bandwidth_out: round_to(rng.gen_range(0.3..=8.0), 2),
        temperature: round_to(rng.gen_range(35.0..=65.0), 1),
        uptime: rng.gen_range(100_000..=9_999_999),
        packet_loss: round_to(rng.gen_range(0.0..=2.0), 2),
        latency: round_to(rng.gen_range(1.0..=50.0), 2),
        timestamp,
    }
}

/// # Summary
/// 生成 5 到 10 条设备告警。
///
/// # Logic
/// 1. 每条告警发生在 `now` 之前 1 到 72 小时。
/// 2. 级别与类型均匀随机，消息中的类型独立抽取。
/// 3. 按时间倒序排列。
pub fn simulate_device_alerts<R: Rng + ?Sized>(
    rng: &mut R,
    device: &Device,
    now: DateTime<Utc>,
) -> Vec<DeviceAlert> {
    let count = rng.gen_range(5..=10);
    let mut alerts: Vec<DeviceAlert> = (1..=count)
        .map(|i| {
            let severity = Severity::ALL
                .choose(rng)
                .copied()
                .unwrap_or(Severity::Info);
            let kind = DEVICE_ALERT_TYPES.choose(rng).copied().unwrap_or_default();
            let message_kind = DEVICE_ALERT_TYPES.choose(rng).copied().unwrap_or_default();
            DeviceAlert {
                id: format!("ALERT-{}-{}", device.id, i),
                timestamp: now - Duration::hours(rng.gen_range(1..=72)),
                severity,
                kind: kind.to_string(),
                message: format!("{} on {}", message_kind, device.name),
                acknowledged: rng.gen_bool(0.5),
            }
        })
        .collect();
    alerts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    alerts
}
