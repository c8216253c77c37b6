use crate::model::{
    AllMetrics, CpuUsage, DeviceInfo, DiscoveredDevice, Discovery, InterfaceStats, MemoryUsage,
};
use crate::oid;
use ictdash_core::common::round_to;
use ictdash_core::common::time::TimeProvider;
use ictdash_core::snmp::entity::{Oid, SnmpTarget, SnmpValue, WalkEntry};
use ictdash_core::snmp::error::SnmpError;
use ictdash_core::snmp::port::SnmpPort;
use std::net::Ipv4Addr;
use std::sync::Arc;

/// walk 未指定数量时的默认返回行数
pub const DEFAULT_WALK_RESULTS: usize = 10;
/// walk 返回行数上限
pub const MAX_WALK_RESULTS: usize = 100;
// 发现结果中描述文字的最大字符数
const DESCRIPTION_CHARS: usize = 100;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// # Summary
/// SNMP 轮询服务，把单个 OID 的读取组合成设备级的查询。
///
/// # Invariants
/// - 每个指标一次独立的 GET，按固定顺序串行执行。
/// - 失败原因只写日志；调用方得到的是 `None` 或缺失的字段。
pub struct SnmpService {
    port: Arc<dyn SnmpPort>,
    clock: Arc<dyn TimeProvider>,
}

impl SnmpService {
    pub fn new(port: Arc<dyn SnmpPort>, clock: Arc<dyn TimeProvider>) -> Self {
        Self { port, clock }
    }

    async fn read(&self, target: &SnmpTarget, parts: &[u32]) -> Option<SnmpValue> {
        let oid = Oid::from_slice(parts);
        match self.port.get(target, &oid).await {
            Ok(value) => Some(value),
            Err(e) => {
                log_failure(target, &oid, &e);
                None
            }
        }
    }

    async fn read_number(&self, target: &SnmpTarget, parts: &[u32]) -> Option<i64> {
        self.read(target, parts).await.and_then(|v| v.as_i64())
    }

    async fn read_counter(&self, target: &SnmpTarget, parts: &[u32]) -> Option<u64> {
        self.read(target, parts).await.and_then(|v| v.as_u64())
    }

    /// # Summary
    /// 读取 system 组。
    ///
    /// # Logic
    /// 1. sysDescr 读不到即视为设备不可达，返回 `None`，后续请求不再发出。
    /// 2. sysName、sysUpTime 可选。运行时长 = ticks / 100 秒。
    pub async fn device_info(&self, target: &SnmpTarget) -> Option<DeviceInfo> {
        let description = self.read(target, oid::SYS_DESCR).await?.to_string();
        let hostname = self.read(target, oid::SYS_NAME).await.map(|v| v.to_string());
        let uptime_seconds = self
            .read(target, oid::SYS_UPTIME)
            .await
            .and_then(|v| v.as_u64())
            .and_then(|ticks| u32::try_from(ticks).ok())
            .map(|ticks| f64::from(ticks) / 100.0);

        Some(DeviceInfo {
            host: target.host.clone(),
            description,
            hostname,
            uptime_seconds,
            uptime_days: uptime_seconds.map(|s| round_to(s / SECONDS_PER_DAY, 2)),
            timestamp: self.clock.now(),
        })
    }

    /// Cisco CPU 负载，两个平均值都读不到时返回 `None`
    pub async fn cpu_usage(&self, target: &SnmpTarget) -> Option<CpuUsage> {
        let cpu_5sec = self.read_number(target, oid::CISCO_CPU_5SEC).await;
        let cpu_1min = self.read_number(target, oid::CISCO_CPU_1MIN).await;
        if cpu_5sec.is_none() && cpu_1min.is_none() {
            return None;
        }
        Some(CpuUsage {
            cpu_5sec,
            cpu_1min,
            timestamp: self.clock.now(),
        })
    }

    /// # Summary
    /// Cisco 处理器内存池。
    ///
    /// # Logic
    /// 1. 已用量必须可读。
    /// 2. 空闲量可读时补充总量与使用率 (两位小数)；总量为 0 时不计算使用率。
    pub async fn memory_usage(&self, target: &SnmpTarget) -> Option<MemoryUsage> {
        let memory_used = self.read_counter(target, oid::CISCO_MEMORY_USED).await?;
        let memory_free = self.read_counter(target, oid::CISCO_MEMORY_FREE).await;
        let memory_total = memory_free.map(|free| memory_used.saturating_add(free));
        let memory_percent = memory_total
            .filter(|total| *total > 0)
            .map(|total| round_to(fraction(memory_used, total) * 100.0, 2));

        Some(MemoryUsage {
            memory_used,
            memory_free,
            memory_total,
            memory_percent,
            timestamp: self.clock.now(),
        })
    }

    /// 接口计数器与运行状态，三项全部读不到时返回 `None`
    pub async fn interface_stats(&self, target: &SnmpTarget, index: u32) -> Option<InterfaceStats> {
        let column = |parts: &[u32]| Oid::from_slice(parts).child(index);

        let bytes_in = self
            .read(target, column(oid::IF_IN_OCTETS).parts())
            .await
            .and_then(|v| v.as_u64());
        let bytes_out = self
            .read(target, column(oid::IF_OUT_OCTETS).parts())
            .await
            .and_then(|v| v.as_u64());
        let status = self
            .read(target, column(oid::IF_OPER_STATUS).parts())
            .await
            .and_then(|v| v.as_i64())
            .map(|code| oid::oper_status_name(code).to_string());

        if bytes_in.is_none() && bytes_out.is_none() && status.is_none() {
            return None;
        }
        Some(InterfaceStats {
            interface_index: index,
            bytes_in,
            bytes_out,
            status,
            timestamp: self.clock.now(),
        })
    }

    /// 依次执行全部查询 (接口固定为 1)，结果中只保留成功的分组
    pub async fn all_metrics(&self, target: &SnmpTarget) -> AllMetrics {
        let timestamp = self.clock.now();
        let device_info = self.device_info(target).await;
        let cpu = self.cpu_usage(target).await;
        let memory = self.memory_usage(target).await;
        let interface = self.interface_stats(target, 1).await;
        AllMetrics {
            host: target.host.clone(),
            timestamp,
            device_info,
            cpu,
            memory,
            interface,
        }
    }

    /// # Summary
    /// 遍历 `root` 子树。
    ///
    /// # Logic
    /// 1. 从 `root` 开始反复 GETNEXT。
    /// 2. 返回的 OID 离开子树、任何一次请求出错或达到行数上限时停止。
    /// 3. `max_results` 限制在 `[1, 100]`。
    ///
    /// # Returns
    /// 一行也没有时返回 `None`。
    pub async fn walk(
        &self,
        target: &SnmpTarget,
        root: &Oid,
        max_results: usize,
    ) -> Option<Vec<WalkEntry>> {
        let limit = max_results.clamp(1, MAX_WALK_RESULTS);
        let mut rows = Vec::new();
        let mut cursor = root.clone();

        while rows.len() < limit {
            let varbind = match self.port.get_next(target, &cursor).await {
                Ok(vb) => vb,
                Err(e) => {
                    log_failure(target, &cursor, &e);
                    break;
                }
            };
            if !varbind.oid.is_under(root) {
                break;
            }
            cursor = varbind.oid.clone();
            rows.push(WalkEntry::from(varbind));
        }

        if rows.is_empty() { None } else { Some(rows) }
    }

    /// # Summary
    /// 在网段中探测常见的网关地址。
    ///
    /// # Logic
    /// 1. 由 `network` (如 `10.0.0.0/24`) 得到 `.1` 与 `.254` 两个候选地址。
    /// 2. 对每个候选执行 `device_info`，应答者记入结果。
    ///
    /// # Returns
    /// `network` 不是 IPv4 网段时返回 `None`。
    pub async fn discover(
        &self,
        network: &str,
        community: &str,
        port: u16,
    ) -> Option<Discovery> {
        let candidates = discovery_candidates(network)?;
        let mut discovered_devices = Vec::new();

        for ip in candidates {
            let target = SnmpTarget::new(ip.to_string(), community, port);
            if let Some(info) = self.device_info(&target).await {
                discovered_devices.push(DiscoveredDevice {
                    ip: ip.to_string(),
                    hostname: info.hostname.unwrap_or_else(|| "Unknown".to_string()),
                    description: info.description.chars().take(DESCRIPTION_CHARS).collect(),
                });
            }
        }

        tracing::info!(
            "SNMP discovery on {} found {} device(s)",
            network,
            discovered_devices.len()
        );
        Some(Discovery {
            network: network.to_string(),
            count: discovered_devices.len(),
            discovered_devices,
        })
    }
}

/// `network` 所在 /24 的 `.1` 与 `.254`；前缀长度被忽略
pub fn discovery_candidates(network: &str) -> Option<[Ipv4Addr; 2]> {
    let address = network.split('/').next()?.trim();
    let [a, b, c, _] = address.parse::<Ipv4Addr>().ok()?.octets();
    Some([Ipv4Addr::new(a, b, c, 1), Ipv4Addr::new(a, b, c, 254)])
}

#[allow(clippy::cast_precision_loss)]
fn fraction(part: u64, whole: u64) -> f64 {
    part as f64 / whole as f64
}

fn log_failure(target: &SnmpTarget, oid: &Oid, error: &SnmpError) {
    match error {
        SnmpError::NoSuchObject(_) | SnmpError::EndOfMib => {
            tracing::debug!("SNMP {}:{} {}: {}", target.host, target.port, oid, error)
        }
        _ => tracing::warn!("SNMP {}:{} {}: {}", target.host, target.port, oid, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_candidates() {
        let [first, last] = discovery_candidates("192.168.10.0/24").unwrap();
        assert_eq!(first.to_string(), "192.168.10.1");
        assert_eq!(last.to_string(), "192.168.10.254");
        assert!(discovery_candidates("10.0.0.7").is_some());
        assert!(discovery_candidates("").is_none());
        assert!(discovery_candidates("office-lan").is_none());
        assert!(discovery_candidates("10.0.0/24").is_none());
    }

    #[test]
    fn test_fraction() {
        assert_eq!(round_to(fraction(1, 3) * 100.0, 2), 33.33);
    }
}
