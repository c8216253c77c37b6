use async_trait::async_trait;
use ictdash_core::common::time::{TimeProvider, rfc3339};
use ictdash_core::inventory::entity::{Device, Inventory, Office};
use ictdash_core::store::error::StoreError;
use ictdash_core::store::port::InventoryStore;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// InventoryStore 的 JSON 种子文件实现。
///
/// # Summary
/// 每次 `load` 都重新读取种子文件，因此对文件的修改无需重启即可生效。
///
/// # Invariants
/// * 文件缺失或整体无法解析时返回空清单并记录告警，从不向调用方报错。
/// * 单条办公室或设备记录无效时只跳过该条，其余记录照常加载。
/// * 种子中缺少 `last_seen` 的设备以加载时刻 (注入的时钟) 补齐。
pub struct JsonInventoryStore {
    path: PathBuf,
    clock: Arc<dyn TimeProvider>,
}

impl JsonInventoryStore {
    pub fn new(path: impl Into<PathBuf>, clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InventoryStore for JsonInventoryStore {
    /// 读取并解析种子文件。
    ///
    /// # Logic
    /// 1. 读取文件全部字节，不存在时返回空清单。
    /// 2. 顶层解析为 JSON 对象，失败时返回空清单。
    /// 3. `offices` / `devices` 逐条反序列化，无效条目记录告警后跳过。
    ///
    /// # Returns
    /// * `Result<Inventory, StoreError>` - 仅在非"文件不存在"类 I/O 故障时返回错误。
    async fn load(&self) -> Result<Inventory, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!("{} not found, using empty inventory", self.path.display());
                return Ok(Inventory::default());
            }
            Err(e) => return Err(StoreError::Io(format!("{}: {}", self.path.display(), e))),
        };

        let root: Value = match serde_json::from_slice(&bytes) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("Error loading {}: {}", self.path.display(), e);
                return Ok(Inventory::default());
            }
        };

        let now = Value::String(rfc3339(self.clock.now()));
        let offices: Vec<Office> = entries(&root, "offices", |_| {});
        let devices: Vec<Device> = entries(&root, "devices", |raw| {
            if let Value::Object(fields) = raw {
                fields.entry("last_seen").or_insert_with(|| now.clone());
            }
        });

        tracing::debug!(
            "Loaded {} offices and {} devices",
            offices.len(),
            devices.len()
        );
        Ok(Inventory { offices, devices })
    }
}

/// 逐条反序列化 `root[section]`，`prepare` 可在反序列化前补齐字段
fn entries<T: DeserializeOwned>(
    root: &Value,
    section: &str,
    prepare: impl Fn(&mut Value),
) -> Vec<T> {
    let Some(items) = root.get(section).and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let mut raw = raw.clone();
            prepare(&mut raw);
            match serde_json::from_value(raw) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping {}[{}]: {}", section, i, e);
                    None
                }
            }
        })
        .collect()
}
