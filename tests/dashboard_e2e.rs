use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use railtwin::panels::header::SystemStatus;
use railtwin::{Dashboard, DashboardSnapshot, Scheduler, TwinConfig, VirtualScheduler};

fn mounted(seed: u64) -> (Arc<VirtualScheduler>, Dashboard) {
    let sched = Arc::new(VirtualScheduler::starting_at(DateTime::<Utc>::UNIX_EPOCH));
    let config = TwinConfig {
        seed: Some(seed),
        ..TwinConfig::default()
    };
    let dash = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &config).unwrap();
    (sched, dash)
}

#[test]
fn each_panel_ticks_on_its_own_interval() {
    let (sched, dash) = mounted(4);
    let start = dash.snapshot().unwrap();

    // 1 s: only the header has ticked.
    sched.advance(Duration::from_secs(1)).unwrap();
    let s1 = dash.snapshot().unwrap();
    assert_ne!(s1.header, start.header);
    assert_eq!(s1.trains, start.trains);
    assert_eq!(s1.climate, start.climate);

    // 2 s: trains move, climate still waits for 5 s.
    sched.advance(Duration::from_secs(1)).unwrap();
    let s2 = dash.snapshot().unwrap();
    assert_ne!(s2.trains, start.trains);
    assert_eq!(s2.climate, start.climate);

    sched.advance(Duration::from_secs(3)).unwrap();
    let s5 = dash.snapshot().unwrap();
    assert_ne!(s5.climate, start.climate);
    assert_eq!(s5.header.system_status, SystemStatus::Optimal);
}

#[test]
fn snapshot_serializes_and_reads_back() {
    let (sched, dash) = mounted(8);
    sched.advance(Duration::from_secs(12)).unwrap();
    let snap = dash.snapshot().unwrap();

    let json = serde_json::to_string(&snap).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["trains"]["trains"][0]["id"], "T001");
    assert_eq!(value["trains"]["trains"][3]["status"], "maintenance");
    assert_eq!(value["immersive"]["sessions"][1]["kind"], "VR");

    let back: DashboardSnapshot = serde_json::from_str(&json).unwrap();
    let ids = |s: &DashboardSnapshot| s.trains.trains.iter().map(|t| t.id.clone()).collect::<Vec<_>>();
    assert_eq!(ids(&back), ids(&snap));
    assert_eq!(back.trains.trains.records()[2].passengers, snap.trains.trains.records()[2].passengers);
    assert_eq!(back.ai_center.scenarios, snap.ai_center.scenarios);
}

#[test]
fn different_seeds_diverge() {
    let (s1, d1) = mounted(1);
    let (s2, d2) = mounted(2);
    s1.advance(Duration::from_secs(10)).unwrap();
    s2.advance(Duration::from_secs(10)).unwrap();
    assert_ne!(d1.snapshot().unwrap().trains, d2.snapshot().unwrap().trains);
}
