//! # 测试替身
//!
//! 供各 crate 的集成测试使用的端口假实现，仅在 `test-utils` feature 下编译。

use crate::external::entity::{CountryInfo, IpLocation, NewsArticle, Weather, ZoneTime};
use crate::external::error::FeedError;
use crate::external::port::{CountrySource, IpLocationSource, NewsSource, TimeSource, WeatherSource};
use crate::inventory::entity::Inventory;
use crate::snmp::entity::{Oid, SnmpTarget, SnmpValue, VarBind};
use crate::snmp::error::SnmpError;
use crate::snmp::port::SnmpPort;
use crate::store::error::StoreError;
use crate::store::port::InventoryStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// # Summary
/// 内存中的 SNMP 代理：按 OID 字典序保存 MIB 视图。
///
/// # Invariants
/// - 只响应 `host` 与 `community` 均匹配的请求，其余一律超时。
pub struct FakeSnmpAgent {
    host: String,
    community: String,
    mib: Mutex<BTreeMap<Oid, SnmpValue>>,
    requests: AtomicUsize,
}

impl FakeSnmpAgent {
    pub fn new(host: &str, community: &str) -> Self {
        Self {
            host: host.to_string(),
            community: community.to_string(),
            mib: Mutex::new(BTreeMap::new()),
            requests: AtomicUsize::new(0),
        }
    }

    /// 写入一个 OID 的值
    pub fn with(self, oid: &str, value: SnmpValue) -> Self {
        if let Ok(oid) = oid.parse::<Oid>() {
            self.mib
                .lock()
                .unwrap_or_else(|p| p.into_inner())
                .insert(oid, value);
        }
        self
    }

    /// 已处理的请求数 (含失败)
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn check(&self, target: &SnmpTarget) -> Result<(), SnmpError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if target.host != self.host || target.community != self.community {
            return Err(SnmpError::Transport("request timed out".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl SnmpPort for FakeSnmpAgent {
    async fn get(&self, target: &SnmpTarget, oid: &Oid) -> Result<SnmpValue, SnmpError> {
        self.check(target)?;
        self.mib
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .get(oid)
            .cloned()
            .ok_or_else(|| SnmpError::NoSuchObject(oid.to_string()))
    }

    async fn get_next(&self, target: &SnmpTarget, oid: &Oid) -> Result<VarBind, SnmpError> {
        self.check(target)?;
        let mib = self.mib.lock().unwrap_or_else(|p| p.into_inner());
        mib.range(oid.clone()..)
            .find(|(k, _)| *k > oid)
            .map(|(k, v)| VarBind {
                oid: k.clone(),
                value: v.clone(),
            })
            .ok_or(SnmpError::EndOfMib)
    }
}

/// # Summary
/// 一律失败的上游，模拟网络不可达。同时统计被调用次数。
#[derive(Default)]
pub struct UnreachableUpstream {
    calls: AtomicUsize,
}

impl UnreachableUpstream {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> Result<T, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(FeedError::Network("connection refused".into()))
    }
}

#[async_trait]
impl WeatherSource for UnreachableUpstream {
    async fn current(&self, _latitude: f64, _longitude: f64) -> Result<Weather, FeedError> {
        self.fail()
    }
}

#[async_trait]
impl IpLocationSource for UnreachableUpstream {
    async fn locate(&self, _ip: IpAddr) -> Result<IpLocation, FeedError> {
        self.fail()
    }
}

#[async_trait]
impl CountrySource for UnreachableUpstream {
    async fn country(&self, _code: &str) -> Result<CountryInfo, FeedError> {
        self.fail()
    }
}

#[async_trait]
impl TimeSource for UnreachableUpstream {
    async fn zone_time(&self, _timezone: &str) -> Result<ZoneTime, FeedError> {
        self.fail()
    }

    async fn zone_names(&self) -> Result<Vec<String>, FeedError> {
        self.fail()
    }
}

#[async_trait]
impl NewsSource for UnreachableUpstream {
    async fn headlines(
        &self,
        _language: &str,
        _max_items: usize,
    ) -> Result<Vec<NewsArticle>, FeedError> {
        self.fail()
    }
}

/// 固定内容的内存清单
pub struct MemoryInventoryStore {
    inventory: Inventory,
}

impl MemoryInventoryStore {
    pub fn new(inventory: Inventory) -> Self {
        Self { inventory }
    }
}

#[async_trait]
impl InventoryStore for MemoryInventoryStore {
    async fn load(&self) -> Result<Inventory, StoreError> {
        Ok(self.inventory.clone())
    }
}
