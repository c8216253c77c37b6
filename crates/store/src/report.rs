use async_trait::async_trait;
use ictdash_core::store::error::StoreError;
use ictdash_core::store::port::{Report, ReportStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FILE_PREFIX: &str = "report_";
const FILE_SUFFIX: &str = ".json";

/// ReportStore 的文件实现。
///
/// # Summary
/// 每份报告保存为 `<dir>/report_<id>.json` 的格式化 JSON。
///
/// # Invariants
/// * 报告 ID 只允许 `[A-Za-z0-9-]`，防止路径穿越。
/// * 同 ID 写入直接覆盖。
pub struct FileReportStore {
    dir: PathBuf,
}

impl FileReportStore {
    /// 创建存储并确保目录存在。
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| StoreError::Io(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn report_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_id(id)?;
        Ok(self.dir.join(format!("{FILE_PREFIX}{id}{FILE_SUFFIX}")))
    }
}

fn validate_id(id: &str) -> Result<(), StoreError> {
    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(StoreError::InvalidId(id.to_string()));
    }
    Ok(())
}

fn io_err(path: &Path, e: std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl ReportStore for FileReportStore {
    async fn save(&self, report: &Report) -> Result<(), StoreError> {
        let path = self.report_path(&report.id)?;
        let body =
            serde_json::to_vec_pretty(report).map_err(|e| StoreError::Format(e.to_string()))?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_err(&self.dir, e))?;
        tokio::fs::write(&path, body)
            .await
            .map_err(|e| io_err(&path, e))?;
        tracing::info!("Report {} saved to {}", report.id, path.display());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Report>, StoreError> {
        // 非法 ID 不可能对应已保存的报告
        let Ok(path) = self.report_path(id) else {
            return Ok(None);
        };
        let bytes = match tokio::fs::read(&path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_err(&path, e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Format(format!("{}: {}", path.display(), e)))
    }

    /// 列出全部报告。
    ///
    /// # Logic
    /// 1. 目录不存在时返回空列表。
    /// 2. 只处理 `report_*.json` 文件，损坏的文件记录告警后跳过。
    /// 3. 按 `generated_at` 倒序排列 (RFC 3339 文本序即时间序)。
    async fn list(&self) -> Result<Vec<Report>, StoreError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_err(&self.dir, e)),
        };

        let mut reports = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_err(&self.dir, e))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !name.starts_with(FILE_PREFIX) || !name.ends_with(FILE_SUFFIX) {
                continue;
            }

            let path = entry.path();
            let parsed = match tokio::fs::read(&path).await {
                Ok(bytes) => serde_json::from_slice::<Report>(&bytes).map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            match parsed {
                Ok(report) => reports.push(report),
                Err(e) => tracing::warn!("Skipping unreadable report {}: {}", path.display(), e),
            }
        }

        reports.sort_by(|a, b| b.generated_at.cmp(&a.generated_at));
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("RPT-20260301120000").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("../secret").is_err());
        assert!(validate_id("RPT 1").is_err());
    }
}
