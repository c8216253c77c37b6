use async_trait::async_trait;
use ictdash_core::cache::error::CacheError;
use ictdash_core::cache::port::Cache;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

// 临时文件序号，保证同进程内并发写入的临时文件名互不冲突
static TMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// # Summary
/// 单目录、单 TTL 的 JSON 文件缓存。
///
/// # Invariants
/// - 每个键对应 `<dir>/<净化后的键>.json` 一个文件，文件的修改时间即写入时间。
/// - 条目新鲜当且仅当 `now - mtime < ttl`；mtime 晚于当前时间视为刚写入。
/// - 无淘汰、无容量上限、无跨进程锁；写入先落临时文件再重命名，读者不会看到半截内容。
pub struct FileCache {
    // 缓存根目录
    dir: PathBuf,
    // 条目有效期
    ttl: Duration,
}

impl FileCache {
    /// # Summary
    /// 创建文件缓存并确保目录存在。
    ///
    /// # Arguments
    /// * `dir` - 缓存目录，不存在时递归创建。
    /// * `ttl` - 条目有效期。
    ///
    /// # Returns
    /// * `Result<Self, CacheError>` - 目录无法创建时返回 `Storage`。
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Result<Self, CacheError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|e| CacheError::Storage(format!("{}: {}", dir.display(), e)))?;
        Ok(Self { dir, ttl })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 键映射到的缓存文件路径
    pub fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        Ok(self.dir.join(format!("{}.json", sanitize_key(key)?)))
    }
}

/// # Summary
/// 把缓存键转换为安全的文件名片段。
///
/// # Logic
/// 1. `[A-Za-z0-9._-]` 之外的字符替换为 `_` (IPv6 冒号、路径分隔符等)。
/// 2. 结果为空或只由 `.` 组成时拒绝，避免指向目录本身或父目录。
pub fn sanitize_key(key: &str) -> Result<String, CacheError> {
    let cleaned: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(CacheError::InvalidKey(key.to_string()));
    }
    Ok(cleaned)
}

/// # Summary
/// 判断写入时间为 `modified` 的条目在 `now` 时刻是否仍然新鲜。
pub fn is_fresh(modified: SystemTime, now: SystemTime, ttl: Duration) -> bool {
    match now.duration_since(modified) {
        Ok(age) => age < ttl,
        // 时钟回拨或 mtime 在未来
        Err(_) => true,
    }
}

fn storage_err(path: &Path, e: std::io::Error) -> CacheError {
    CacheError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl Cache for FileCache {
    /// # Summary
    /// 写入条目。
    ///
    /// # Logic
    /// 1. 确保目录存在 (可能已被 clear 或外部删除)。
    /// 2. 写入同目录下的临时文件。
    /// 3. 重命名覆盖正式文件，使其 mtime 刷新为当前时间。
    async fn set_raw(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_err(&self.dir, e))?;

        let seq = TMP_SEQ.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .dir
            .join(format!(".{}.{}.tmp", std::process::id(), seq));
        tokio::fs::write(&tmp, &value)
            .await
            .map_err(|e| storage_err(&tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            if tokio::fs::remove_file(&tmp).await.is_err() {
                tracing::warn!("Failed to remove temp cache file {}", tmp.display());
            }
            return Err(storage_err(&path, e));
        }

        tracing::debug!("Cache write {} ({} bytes)", path.display(), value.len());
        Ok(())
    }

    /// # Summary
    /// 读取新鲜条目。
    ///
    /// # Logic
    /// 1. 文件不存在返回 `None`。
    /// 2. 根据 mtime 与 TTL 判断新鲜度，过期返回 `None` (文件保留，等待下次覆盖)。
    /// 3. 读取全部字节。
    async fn get_raw(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.entry_path(key)?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_err(&path, e)),
        };
        let modified = metadata.modified().map_err(|e| storage_err(&path, e))?;

        if !is_fresh(modified, SystemTime::now(), self.ttl) {
            tracing::debug!("Cache stale {}", path.display());
            return Ok(None);
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                tracing::debug!("Cache hit {}", path.display());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_err(&path, e)),
        }
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_err(&path, e)),
        }
    }

    /// # Summary
    /// 删除整个缓存目录后重建空目录。
    async fn clear(&self) -> Result<(), CacheError> {
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(storage_err(&self.dir, e)),
        }
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_err(&self.dir, e))?;
        tracing::info!("Cache cleared: {}", self.dir.display());
        Ok(())
    }
}
