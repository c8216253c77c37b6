//! # `ictdash-cache` - 缓存适配器
//!
//! 提供基于文件修改时间判断新鲜度的 TTL 文件缓存，实现 `ictdash_core::cache::port::Cache`。

pub mod file;
