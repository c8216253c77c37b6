//! 轮询使用的 MIB 对象。标量以 `.0` 结尾，接口表列需追加接口索引。

/// sysDescr
pub const SYS_DESCR: &[u32] = &[1, 3, 6, 1, 2, 1, 1, 1, 0];
/// sysUpTime，单位 1/100 秒
pub const SYS_UPTIME: &[u32] = &[1, 3, 6, 1, 2, 1, 1, 3, 0];
/// sysName
pub const SYS_NAME: &[u32] = &[1, 3, 6, 1, 2, 1, 1, 5, 0];

/// Cisco avgBusy1 (5 秒平均)
pub const CISCO_CPU_5SEC: &[u32] = &[1, 3, 6, 1, 4, 1, 9, 2, 1, 56, 0];
/// Cisco avgBusy5 (1 分钟平均)
pub const CISCO_CPU_1MIN: &[u32] = &[1, 3, 6, 1, 4, 1, 9, 2, 1, 57, 0];
/// ciscoMemoryPoolUsed，处理器内存池
pub const CISCO_MEMORY_USED: &[u32] = &[1, 3, 6, 1, 4, 1, 9, 9, 48, 1, 1, 1, 5, 1];
/// ciscoMemoryPoolFree，处理器内存池
pub const CISCO_MEMORY_FREE: &[u32] = &[1, 3, 6, 1, 4, 1, 9, 9, 48, 1, 1, 1, 6, 1];

/// ifInOctets 列
pub const IF_IN_OCTETS: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 2, 1, 10];
/// ifOutOctets 列
pub const IF_OUT_OCTETS: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 2, 1, 16];
/// ifOperStatus 列
pub const IF_OPER_STATUS: &[u32] = &[1, 3, 6, 1, 2, 1, 2, 2, 1, 8];

/// walk 未指定起点时使用的 system 子树
pub const SYSTEM_SUBTREE: &str = "1.3.6.1.2.1.1";

/// ifOperStatus 数值到文字
pub fn oper_status_name(code: i64) -> &'static str {
    match code {
        1 => "up",
        2 => "down",
        3 => "testing",
        5 => "dormant",
        _ => "unknown",
    }
}
