use ictdash_cache::file::FileCache;
use ictdash_core::cache::port::{Cache, CacheExt};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::time::{Duration, SystemTime};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Reading {
    temperature: f64,
    description: String,
}

/// 把缓存文件的 mtime 往回拨 `secs` 秒
fn age_entry(cache: &FileCache, key: &str, secs: u64) {
    let path = cache.entry_path(key).unwrap();
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(secs))
        .unwrap();
}

#[tokio::test]
async fn test_file_cache_raw_ops() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(tmp.path().join("weather"), Duration::from_secs(1800)).unwrap();
    let key = "-1.2921_36.8219";

    // 未写入时未命中
    assert!(cache.get_raw(key).await.unwrap().is_none());

    cache.set_raw(key, b"{\"a\":1}".to_vec()).await.unwrap();
    assert_eq!(cache.get_raw(key).await.unwrap().unwrap(), b"{\"a\":1}".to_vec());
    assert!(cache.entry_path(key).unwrap().exists());

    // 删除后未命中，重复删除同样成功
    cache.del(key).await.unwrap();
    assert!(cache.get_raw(key).await.unwrap().is_none());
    cache.del(key).await.unwrap();
}

#[tokio::test]
async fn test_file_cache_typed_ops() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(tmp.path(), Duration::from_secs(60)).unwrap();
    let item = Reading {
        temperature: 21.5,
        description: "clear sky".to_string(),
    };

    cache.set("country_KE", &item).await.unwrap();
    let result: Reading = cache.get("country_KE").await.unwrap().unwrap();
    assert_eq!(result, item);
}

#[tokio::test]
async fn test_file_cache_expiry_by_mtime() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(tmp.path(), Duration::from_secs(1800)).unwrap();

    cache.set_raw("fresh", b"1".to_vec()).await.unwrap();
    cache.set_raw("stale", b"2".to_vec()).await.unwrap();
    cache.set_raw("ancient", b"3".to_vec()).await.unwrap();
    age_entry(&cache, "fresh", 1700);
    age_entry(&cache, "stale", 1801);
    age_entry(&cache, "ancient", 3 * 86_400);

    assert!(cache.get_raw("fresh").await.unwrap().is_some());
    assert!(cache.get_raw("stale").await.unwrap().is_none());
    assert!(cache.get_raw("ancient").await.unwrap().is_none());

    // 过期条目在重新写入后恢复新鲜
    cache.set_raw("stale", b"4".to_vec()).await.unwrap();
    assert_eq!(cache.get_raw("stale").await.unwrap().unwrap(), b"4".to_vec());
}

#[tokio::test]
async fn test_file_cache_clear_and_rewrite() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("geo");
    let cache = FileCache::new(&dir, Duration::from_secs(86_400)).unwrap();

    cache.set_raw("ip_8.8.8.8", b"x".to_vec()).await.unwrap();
    cache.set_raw("country_KE", b"y".to_vec()).await.unwrap();
    cache.clear().await.unwrap();

    assert!(dir.exists());
    assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);
    assert!(cache.get_raw("ip_8.8.8.8").await.unwrap().is_none());

    // 目录被外部删除后写入仍然成功
    std::fs::remove_dir_all(&dir).unwrap();
    cache.set_raw("country_KE", b"z".to_vec()).await.unwrap();
    assert!(cache.get_raw("country_KE").await.unwrap().is_some());
}

#[tokio::test]
async fn test_file_cache_rejects_unsafe_key() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(tmp.path(), Duration::from_secs(60)).unwrap();

    assert!(cache.set_raw("..", b"x".to_vec()).await.is_err());
    // 路径分隔符被替换，不会逃出缓存目录
    cache.set_raw("../escape", b"x".to_vec()).await.unwrap();
    let path = cache.entry_path("../escape").unwrap();
    assert_eq!(path.parent().unwrap(), tmp.path());
}

#[tokio::test]
async fn test_file_cache_corrupt_entry_is_deserialize_error() {
    let tmp = tempfile::tempdir().unwrap();
    let cache = FileCache::new(tmp.path(), Duration::from_secs(60)).unwrap();

    cache.set_raw("broken", b"not json".to_vec()).await.unwrap();
    let result: Result<Option<Reading>, _> = cache.get("broken").await;
    assert!(result.is_err());
}
