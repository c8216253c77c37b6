use chrono::{TimeZone, Utc};
use ictdash_core::common::time::FakeClockProvider;
use ictdash_core::snmp::entity::{Oid, SnmpTarget, SnmpValue};
use ictdash_core::snmp::error::SnmpError;
use ictdash_core::snmp::port::SnmpPort;
use ictdash_core::testing::FakeSnmpAgent;
use ictdash_snmp::client::UdpSnmpClient;
use ictdash_snmp::service::SnmpService;
use std::sync::Arc;
use std::time::Duration;

const HOST: &str = "10.20.0.1";

fn cisco_router() -> FakeSnmpAgent {
    FakeSnmpAgent::new(HOST, "public")
        .with(
            "1.3.6.1.2.1.1.1.0",
            SnmpValue::OctetString("Cisco IOS Software, C2900 Software".into()),
        )
        .with("1.3.6.1.2.1.1.3.0", SnmpValue::TimeTicks(864_000_000))
        .with("1.3.6.1.2.1.1.5.0", SnmpValue::OctetString("nbo-core-01".into()))
        .with("1.3.6.1.2.1.1.6.0", SnmpValue::OctetString("Nairobi DC".into()))
        .with("1.3.6.1.2.1.2.1.0", SnmpValue::Integer(4))
        .with("1.3.6.1.4.1.9.2.1.56.0", SnmpValue::Integer(12))
        .with("1.3.6.1.4.1.9.2.1.57.0", SnmpValue::Integer(9))
        .with("1.3.6.1.4.1.9.9.48.1.1.1.5.1", SnmpValue::Unsigned32(30_000))
        .with("1.3.6.1.4.1.9.9.48.1.1.1.6.1", SnmpValue::Unsigned32(70_000))
        .with("1.3.6.1.2.1.2.2.1.8.1", SnmpValue::Integer(1))
        .with("1.3.6.1.2.1.2.2.1.10.1", SnmpValue::Counter32(123_456))
        .with("1.3.6.1.2.1.2.2.1.16.1", SnmpValue::Counter32(654_321))
        .with("1.3.6.1.2.1.2.2.1.8.2", SnmpValue::Integer(2))
}

fn service(agent: Arc<FakeSnmpAgent>) -> SnmpService {
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    SnmpService::new(agent, Arc::new(FakeClockProvider::new(now)))
}

fn target(community: &str) -> SnmpTarget {
    SnmpTarget::new(HOST, community, 161)
}

#[tokio::test]
async fn test_device_info() {
    let svc = service(Arc::new(cisco_router()));
    let info = svc.device_info(&target("public")).await.unwrap();

    assert_eq!(info.host, HOST);
    assert_eq!(info.description, "Cisco IOS Software, C2900 Software");
    assert_eq!(info.hostname.as_deref(), Some("nbo-core-01"));
    assert_eq!(info.uptime_seconds, Some(8_640_000.0));
    assert_eq!(info.uptime_days, Some(100.0));

    let json = serde_json::to_value(&info).unwrap();
    assert_eq!(json["timestamp"], "2026-03-01T12:00:00Z");
}

#[tokio::test]
async fn test_wrong_community_stops_after_first_request() {
    let agent = Arc::new(cisco_router());
    let svc = service(agent.clone());

    assert!(svc.device_info(&target("private")).await.is_none());
    assert_eq!(agent.request_count(), 1);
}

#[tokio::test]
async fn test_device_info_optional_fields() {
    let agent = FakeSnmpAgent::new(HOST, "public")
        .with("1.3.6.1.2.1.1.1.0", SnmpValue::OctetString("Linux edge".into()));
    let info = service(Arc::new(agent))
        .device_info(&target("public"))
        .await
        .unwrap();
    assert!(info.hostname.is_none());
    assert!(info.uptime_seconds.is_none());

    let json = serde_json::to_value(&info).unwrap();
    assert!(json.get("hostname").is_none());
    assert!(json.get("uptime_days").is_none());
}

#[tokio::test]
async fn test_cpu_and_memory() {
    let svc = service(Arc::new(cisco_router()));
    let cpu = svc.cpu_usage(&target("public")).await.unwrap();
    assert_eq!(cpu.cpu_5sec, Some(12));
    assert_eq!(cpu.cpu_1min, Some(9));

    let memory = svc.memory_usage(&target("public")).await.unwrap();
    assert_eq!(memory.memory_used, 30_000);
    assert_eq!(memory.memory_free, Some(70_000));
    assert_eq!(memory.memory_total, Some(100_000));
    assert_eq!(memory.memory_percent, Some(30.0));
}

#[tokio::test]
async fn test_non_cisco_device_has_no_cpu_or_memory() {
    let agent = FakeSnmpAgent::new(HOST, "public")
        .with("1.3.6.1.2.1.1.1.0", SnmpValue::OctetString("Juniper".into()))
        .with("1.3.6.1.4.1.9.9.48.1.1.1.6.1", SnmpValue::Unsigned32(10));
    let svc = service(Arc::new(agent));
    assert!(svc.cpu_usage(&target("public")).await.is_none());
    // 只有空闲量没有已用量
    assert!(svc.memory_usage(&target("public")).await.is_none());
}

#[tokio::test]
async fn test_memory_without_free_counter() {
    let agent = FakeSnmpAgent::new(HOST, "public")
        .with("1.3.6.1.4.1.9.9.48.1.1.1.5.1", SnmpValue::Unsigned32(512));
    let memory = service(Arc::new(agent))
        .memory_usage(&target("public"))
        .await
        .unwrap();
    assert_eq!(memory.memory_used, 512);
    assert!(memory.memory_total.is_none());
    assert!(memory.memory_percent.is_none());
}

#[tokio::test]
async fn test_interface_stats() {
    let svc = service(Arc::new(cisco_router()));

    let up = svc.interface_stats(&target("public"), 1).await.unwrap();
    assert_eq!(up.interface_index, 1);
    assert_eq!(up.bytes_in, Some(123_456));
    assert_eq!(up.bytes_out, Some(654_321));
    assert_eq!(up.status.as_deref(), Some("up"));

    let down = svc.interface_stats(&target("public"), 2).await.unwrap();
    assert_eq!(down.status.as_deref(), Some("down"));
    assert!(down.bytes_in.is_none());

    assert!(svc.interface_stats(&target("public"), 9).await.is_none());
}

#[tokio::test]
async fn test_all_metrics_keeps_successful_groups() {
    let agent = FakeSnmpAgent::new(HOST, "public")
        .with("1.3.6.1.2.1.1.1.0", SnmpValue::OctetString("Switch".into()))
        .with("1.3.6.1.2.1.2.2.1.8.1", SnmpValue::Integer(5));
    let metrics = service(Arc::new(agent))
        .all_metrics(&target("public"))
        .await;

    assert_eq!(metrics.host, HOST);
    assert!(metrics.device_info.is_some());
    assert!(metrics.cpu.is_none());
    assert!(metrics.memory.is_none());
    assert_eq!(
        metrics.interface.and_then(|i| i.status).as_deref(),
        Some("dormant")
    );

    let unreachable = service(Arc::new(cisco_router()))
        .all_metrics(&target("wrong"))
        .await;
    let json = serde_json::to_value(&unreachable).unwrap();
    assert_eq!(json.as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_walk_stays_inside_subtree() {
    let svc = service(Arc::new(cisco_router()));
    let root: Oid = "1.3.6.1.2.1.1".parse().unwrap();

    let rows = svc.walk(&target("public"), &root, 10).await.unwrap();
    let oids: Vec<&str> = rows.iter().map(|r| r.oid.as_str()).collect();
    assert_eq!(
        oids,
        vec![
            "1.3.6.1.2.1.1.1.0",
            "1.3.6.1.2.1.1.3.0",
            "1.3.6.1.2.1.1.5.0",
            "1.3.6.1.2.1.1.6.0"
        ]
    );
    assert_eq!(rows[1].value, "864000000");
}

#[tokio::test]
async fn test_walk_limits() {
    let agent = Arc::new(cisco_router());
    let svc = service(agent.clone());
    let root: Oid = "1.3.6.1.2.1".parse().unwrap();

    let rows = svc.walk(&target("public"), &root, 2).await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(agent.request_count(), 2);

    // 0 按 1 处理
    let rows = svc.walk(&target("public"), &root, 0).await.unwrap();
    assert_eq!(rows.len(), 1);

    let empty: Oid = "1.3.6.1.6".parse().unwrap();
    assert!(svc.walk(&target("public"), &empty, 10).await.is_none());
    assert!(svc.walk(&target("wrong"), &root, 10).await.is_none());
}

#[tokio::test]
async fn test_discover_probes_gateway_addresses() {
    let agent = FakeSnmpAgent::new("10.20.0.254", "public")
        .with(
            "1.3.6.1.2.1.1.1.0",
            SnmpValue::OctetString("x".repeat(150)),
        );
    let agent = Arc::new(agent);
    let svc = service(agent.clone());

    let found = svc.discover("10.20.0.0/24", "public", 161).await.unwrap();
    assert_eq!(found.network, "10.20.0.0/24");
    assert_eq!(found.count, 1);
    let device = &found.discovered_devices[0];
    assert_eq!(device.ip, "10.20.0.254");
    assert_eq!(device.hostname, "Unknown");
    assert_eq!(device.description.len(), 100);

    // .1 一次，.254 三次 (descr/name/uptime)
    assert_eq!(agent.request_count(), 4);

    assert!(svc.discover("not-a-network", "public", 161).await.is_none());
}

#[tokio::test]
async fn test_udp_client_times_out_against_silent_peer() {
    let silent = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = silent.local_addr().unwrap().port();
    let client = UdpSnmpClient::new(Duration::from_millis(200));
    let target = SnmpTarget::new("127.0.0.1", "public", port);
    let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();

    let result = client.get(&target, &oid).await;
    assert!(matches!(result, Err(SnmpError::Transport(_))));
}

/// 把收到的请求原样回送为响应 PDU，并把最后一个变量的 NULL 值改写为 `exception` 标签
async fn spawn_exception_agent(exception: u8) -> u16 {
    let socket = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let port = socket.local_addr().unwrap().port();
    tokio::spawn(async move {
        let mut buf = [0u8; 512];
        loop {
            let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                return;
            };
            let packet = &mut buf[..len];
            // 跳过外层 SEQUENCE 头、version 与 community，定位到 PDU 标签
            let mut idx = 2;
            for _ in 0..2 {
                idx += 2 + usize::from(packet[idx + 1]);
            }
            packet[idx] = 0xA2;
            assert_eq!(&packet[len - 2..], &[0x05, 0x00]);
            packet[len - 2] = exception;
            socket.send_to(packet, peer).await.unwrap();
        }
    });
    port
}

#[tokio::test]
async fn test_udp_client_maps_exception_varbinds() {
    let client = UdpSnmpClient::new(Duration::from_secs(2));
    let oid: Oid = "1.3.6.1.2.1.1.1.0".parse().unwrap();

    // noSuchObject [0x80]
    let port = spawn_exception_agent(0x80).await;
    let target = SnmpTarget::new("127.0.0.1", "public", port);
    let result = client.get(&target, &oid).await;
    assert!(
        matches!(&result, Err(SnmpError::NoSuchObject(o)) if o == "1.3.6.1.2.1.1.1.0"),
        "{result:?}"
    );

    // endOfMibView [0x82]
    let port = spawn_exception_agent(0x82).await;
    let target = SnmpTarget::new("127.0.0.1", "public", port);
    let result = client.get_next(&target, &oid).await;
    assert!(matches!(result, Err(SnmpError::EndOfMib)), "{result:?}");
}
