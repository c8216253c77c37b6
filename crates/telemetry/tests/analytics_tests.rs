use chrono::{TimeZone, Timelike, Utc};
use ictdash_core::common::time::{FakeClockProvider, TimeProvider};
use ictdash_core::inventory::entity::{Device, DeviceStatus, Inventory, Office};
use ictdash_core::store::port::{InventoryStore, ReportStore};
use ictdash_core::telemetry::entity::Severity;
use ictdash_core::testing::MemoryInventoryStore;
use ictdash_store::report::FileReportStore;
use ictdash_telemetry::analytics::{self, AnalyticsService};
use ictdash_telemetry::model::Priority;
use ictdash_telemetry::report::{ReportRequest, ReportService};
use ictdash_telemetry::simulator::MetricsSimulator;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;

fn office(id: &str, region: &str) -> Office {
    Office {
        id: id.to_string(),
        name: format!("{id} Office"),
        country: format!("{id} Country"),
        region: region.to_string(),
        city: "City".to_string(),
        latitude: 0.0,
        longitude: 0.0,
        timezone: "UTC".to_string(),
        status: "active".to_string(),
    }
}

fn device(id: &str, office_id: &str, kind: &str) -> Device {
    Device {
        id: id.to_string(),
        office_id: office_id.to_string(),
        name: format!("{id}-name"),
        device_type: kind.to_string(),
        ip_address: "10.0.0.1".to_string(),
        status: DeviceStatus::Online,
        last_seen: Utc::now(),
    }
}

fn inventory() -> Inventory {
    Inventory {
        offices: vec![
            office("KEN", "Africa"),
            office("NGA", "Africa"),
            office("IND", "Asia-Pacific"),
        ],
        devices: vec![
            device("D1", "KEN", "router"),
            device("D2", "KEN", "switch"),
            device("D3", "NGA", "switch"),
            device("D4", "IND", "access_point"),
            device("D5", "IND", "switch"),
            // 悬空引用
            device("D6", "GONE", "router"),
        ],
    }
}

fn clock() -> Arc<FakeClockProvider> {
    Arc::new(FakeClockProvider::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
    ))
}

#[test]
fn test_summary_counts_and_regions() {
    let mut rng = StdRng::seed_from_u64(1);
    let inv = inventory();
    let s = analytics::global_summary(&mut rng, &inv, Utc::now());

    assert_eq!(s.global_health.total_offices, 3);
    assert_eq!(s.global_health.total_devices, 6);
    // 6 * [0.90, 0.98] 向下取整
    assert_eq!(s.global_health.online_devices, 5);
    assert!(s.global_health.active_offices <= 3);
    assert_eq!(
        s.alerts.total,
        s.alerts.critical + s.alerts.warning + s.alerts.info
    );

    let regions: Vec<_> = s
        .regional_breakdown
        .iter()
        .map(|r| (r.region.as_str(), r.offices, r.devices))
        .collect();
    assert_eq!(regions, vec![("Africa", 2, 3), ("Asia-Pacific", 1, 2)]);
}

#[test]
fn test_region_analytics() {
    let mut rng = StdRng::seed_from_u64(2);
    let inv = inventory();

    let africa = analytics::region_analytics(&mut rng, &inv, "Africa").unwrap();
    assert_eq!(africa.summary.total_offices, 2);
    assert_eq!(africa.summary.total_devices, 3);
    assert_eq!(africa.summary.avg_devices_per_office, 1.5);
    assert_eq!(africa.offices[0].devices_count, 2);
    assert_eq!(africa.offices[1].devices_count, 1);

    assert!(analytics::region_analytics(&mut rng, &inv, "Antarctica").is_none());
    assert!(analytics::region_analytics(&mut rng, &inv, "africa").is_none());
}

#[test]
fn test_alert_feed_filter_limit_and_order() {
    let mut rng = StdRng::seed_from_u64(3);
    let inv = inventory();
    let now = Utc::now();

    let feed = analytics::alert_feed(&mut rng, &inv, Some(Severity::Critical), 15, now);
    assert!(feed.total <= 15);
    assert_eq!(feed.total, feed.alerts.len());
    assert_eq!(feed.critical_count, feed.total);
    assert_eq!(feed.severity_filter, Some(Severity::Critical));
    assert!(feed.alerts.iter().all(|a| a.office_id != "GONE"));
    assert!(
        feed.alerts
            .windows(2)
            .all(|w| w[0].timestamp >= w[1].timestamp)
    );

    let unfiltered = analytics::alert_feed(&mut rng, &inv, None, 100, now);
    assert_eq!(
        unfiltered.total,
        unfiltered.critical_count + unfiltered.warning_count + unfiltered.info_count
    );

    let empty = analytics::alert_feed(&mut rng, &Inventory::default(), None, 50, now);
    assert_eq!(empty.total, 0);
}

#[test]
fn test_trends_shape() {
    let mut rng = StdRng::seed_from_u64(4);
    let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
    let t = analytics::performance_trends(&mut rng, &inventory(), 2, now);

    assert_eq!(t.period_days, 2);
    assert_eq!(t.data_points, 48);
    assert_eq!(t.start_time, Some(now - chrono::Duration::hours(48)));
    assert_eq!(t.end_time, Some(now - chrono::Duration::hours(1)));
    for p in &t.trends {
        // 6 台设备的 5% 向下取整为 0
        assert_eq!(p.devices_online, 6);
        let business = (8..=18).contains(&p.timestamp.hour());
        if business {
            assert!(p.avg_cpu_usage >= 50.0);
        } else {
            assert!(p.avg_cpu_usage <= 55.0);
        }
    }
}

#[test]
fn test_top_performers_sorted() {
    let mut rng = StdRng::seed_from_u64(5);
    let inv = inventory();

    let top = analytics::top_performers(&mut rng, &inv, 2);
    assert!(top.len() <= 2 && !top.is_empty());
    assert!(
        top.windows(2)
            .all(|w| w[0].combined_score >= w[1].combined_score)
    );

    assert!(analytics::top_performers(&mut rng, &Inventory::default(), 10).is_empty());
}

#[test]
fn test_distribution() {
    let d = analytics::device_distribution(&inventory());
    assert_eq!(d.total_devices, 6);
    assert_eq!(d.types_count, 3);
    let kinds: Vec<_> = d
        .distribution
        .iter()
        .map(|t| (t.kind.as_str(), t.count, t.percentage))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("Switch", 3, 50.0),
            ("Router", 2, 33.3),
            ("Access_point", 1, 16.7)
        ]
    );

    let empty = analytics::device_distribution(&Inventory::default());
    assert_eq!(empty.total_devices, 0);
    assert!(empty.distribution.is_empty());
}

#[test]
fn test_health_score_and_recommendations() {
    let mut rng = StdRng::seed_from_u64(6);
    let mut summary = analytics::global_summary(&mut rng, &inventory(), Utc::now());

    summary.global_health.device_health = 100.0;
    summary.global_health.office_health = 100.0;
    summary.performance_metrics.average_uptime_pct = 99.0;
    summary.performance_metrics.average_cpu_usage_pct = 40.0;
    summary.performance_metrics.average_response_time_ms = 50.0;
    summary.alerts.critical = 0;
    let healthy = analytics::health_score(&summary, Utc::now());
    assert_eq!(healthy.health_score, 99.7);
    assert_eq!(healthy.status, "excellent");
    assert_eq!(healthy.recommendations.len(), 1);
    assert_eq!(healthy.recommendations[0].priority, Priority::Info);

    summary.global_health.device_health = 50.0;
    summary.performance_metrics.average_response_time_ms = 150.0;
    summary.alerts.critical = 2;
    let poor = analytics::health_score(&summary, Utc::now());
    // 0.4 * 50 + 0.3 * 100 + 0.3 * 99
    assert_eq!(poor.health_score, 79.7);
    assert_eq!(poor.status, "fair");
    let priorities: Vec<_> = poor.recommendations.iter().map(|r| r.priority).collect();
    assert_eq!(
        priorities,
        vec![Priority::High, Priority::Medium, Priority::Low]
    );
    assert!(poor.recommendations[0].message.starts_with("2 critical"));
}

#[test]
fn test_simulator_history_uses_clock() {
    let clock = clock();
    let sim = MetricsSimulator::new(clock.clone());
    let history = sim.metrics_history(24);
    assert_eq!(history.len(), 24);
    assert_eq!(history[0].timestamp, clock.now() - chrono::Duration::hours(24));
    assert_eq!(history[23].timestamp, clock.now() - chrono::Duration::hours(1));
    assert_eq!(sim.current_metrics().timestamp, clock.now());
}

#[tokio::test]
async fn test_service_reloads_inventory() -> anyhow::Result<()> {
    let store: Arc<dyn InventoryStore> = Arc::new(MemoryInventoryStore::new(inventory()));
    let service = AnalyticsService::new(store, clock());

    let dist = service.distribution().await?;
    assert_eq!(dist.total_devices, 6);
    assert!(service.region("Europe-CIS").await?.is_none());
    let score = service.health_score().await?;
    assert!(score.health_score > 0.0);
    Ok(())
}

#[tokio::test]
async fn test_report_generate_and_fetch() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let clock = clock();
    let inventory: Arc<dyn InventoryStore> = Arc::new(MemoryInventoryStore::new(inventory()));
    let analytics = Arc::new(AnalyticsService::new(inventory, clock.clone()));
    let store: Arc<dyn ReportStore> = Arc::new(FileReportStore::new(tmp.path())?);
    let service = ReportService::new(analytics, store, clock.clone());

    let full = service.generate(&ReportRequest::default()).await?;
    assert_eq!(full.id, "RPT-20260301120000");
    assert_eq!(full.kind, "summary");
    assert_eq!(full.generated_by, "system");
    assert_eq!(full.generated_at, "2026-03-01T12:00:00Z");
    assert_eq!(full.trends.as_ref().unwrap()["data_points"], 168);
    assert!(full.alerts.as_ref().unwrap()["total"].as_u64().unwrap() <= 20);
    assert_eq!(full.device_distribution["total_devices"], 6);

    clock.set_time(Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap());
    let slim = service
        .generate(&ReportRequest {
            kind: "weekly".to_string(),
            user: "ops".to_string(),
            include_trends: false,
            include_alerts: false,
        })
        .await?;
    assert!(slim.trends.is_none() && slim.alerts.is_none());

    let fetched = service.get("RPT-20260302093000").await?.unwrap();
    assert_eq!(fetched.kind, "weekly");

    let all = service.list().await?;
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, "RPT-20260302093000");
    Ok(())
}

#[test]
fn test_report_request_defaults() {
    let req: ReportRequest = serde_json::from_str(r#"{"include_trends": false}"#).unwrap();
    assert_eq!(req.kind, "summary");
    assert_eq!(req.user, "system");
    assert!(!req.include_trends);
    assert!(req.include_alerts);
}
