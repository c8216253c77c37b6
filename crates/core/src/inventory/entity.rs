use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// # Summary
/// 办公室实体，对应种子数据中的一条国家办事处记录。
///
/// # Invariants
/// - `id` 在清单内唯一 (例如 `CO-AF-KEN`)。
/// - `timezone` 为 IANA 时区名 (例如 `Africa/Nairobi`)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Office {
    // 办公室唯一标识
    pub id: String,
    // 办公室名称
    pub name: String,
    // 所在国家
    pub country: String,
    // 大区 (Africa, Asia-Pacific, Europe-CIS, Latin America)
    pub region: String,
    // 所在城市
    pub city: String,
    // 纬度
    pub latitude: f64,
    // 经度
    pub longitude: f64,
    // IANA 时区
    #[serde(default = "default_timezone")]
    pub timezone: String,
    // 运营状态，缺省为 active
    #[serde(default = "default_office_status")]
    pub status: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_office_status() -> String {
    "active".to_string()
}

/// # Summary
/// 设备在线状态。
///
/// # Invariants
/// - 种子文件中无法识别的状态 (如 `maintenance`) 反序列化为 `Unknown`，不影响其余设备。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    Online,
    Offline,
    Warning,
    #[serde(other)]
    Unknown,
}

impl FromStr for DeviceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "online" => Ok(DeviceStatus::Online),
            "offline" => Ok(DeviceStatus::Offline),
            "warning" => Ok(DeviceStatus::Warning),
            "unknown" => Ok(DeviceStatus::Unknown),
            _ => Err(format!("Unknown device status: {}", s)),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceStatus::Online => write!(f, "online"),
            DeviceStatus::Offline => write!(f, "offline"),
            DeviceStatus::Warning => write!(f, "warning"),
            DeviceStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// # Summary
/// 网络设备实体 (路由器、交换机、防火墙、无线接入点)。
///
/// # Invariants
/// - `office_id` 指向清单中的某个办公室；悬空引用的设备在统计中被忽略。
/// - `device_type` 保留种子文件中的原始字符串，常见取值为
///   `router` / `switch` / `firewall` / `access_point`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    // 设备唯一标识
    pub id: String,
    // 所属办公室
    pub office_id: String,
    // 设备名称
    pub name: String,
    // 设备类型
    pub device_type: String,
    // 管理地址
    pub ip_address: String,
    // 在线状态
    #[serde(default = "default_device_status")]
    pub status: DeviceStatus,
    // 最近一次被看到的时间，种子数据中缺省时取加载时刻
    #[serde(default = "Utc::now")]
    pub last_seen: DateTime<Utc>,
}

fn default_device_status() -> DeviceStatus {
    DeviceStatus::Online
}

/// 种子文件的顶层结构 `{"offices": [...], "devices": [...]}`。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub offices: Vec<Office>,
    #[serde(default)]
    pub devices: Vec<Device>,
}

impl Inventory {
    /// 按 ID 查找办公室
    pub fn office(&self, id: &str) -> Option<&Office> {
        self.offices.iter().find(|o| o.id == id)
    }

    /// 按 ID 查找设备
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }

    /// 某办公室名下的全部设备
    pub fn devices_of<'a>(&'a self, office_id: &'a str) -> impl Iterator<Item = &'a Device> + 'a {
        self.devices.iter().filter(move |d| d.office_id == office_id)
    }
}
