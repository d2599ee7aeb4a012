use std::sync::Arc;
use std::time::Duration;

use railtwin::panels::security::{AlertCategory, AlertStatus};
use railtwin::{Dashboard, Scheduler, Severity, TwinConfig, VirtualScheduler};

fn config(probability: f64, capacity: usize) -> TwinConfig {
    let mut config = TwinConfig {
        seed: Some(11),
        ..TwinConfig::default()
    };
    config.alerts.spawn_probability = probability;
    config.alerts.capacity = capacity;
    config
}

#[test]
fn feed_is_capped_and_newest_first() {
    let sched = Arc::new(VirtualScheduler::new());
    let dash = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &config(1.0, 10)).unwrap();

    for _ in 0..20 {
        sched.advance(Duration::from_secs(3)).unwrap();
        let len = dash.security().with(|p| p.alerts.len()).unwrap();
        assert!(len <= 10);
    }

    let alerts = dash.security().with(|p| p.alerts.clone()).unwrap();
    assert_eq!(alerts.len(), 10);
    for pair in alerts.iter().collect::<Vec<_>>().windows(2) {
        assert!(pair[0].timestamp >= pair[1].timestamp);
    }
    for alert in &alerts {
        assert!(alert.id.starts_with("SEC") && alert.id.len() == 6);
        assert!(matches!(alert.category, AlertCategory::Anomaly | AlertCategory::Normal));
        assert!(matches!(alert.severity, Severity::Low | Severity::Medium));
        assert_eq!(alert.status, AlertStatus::Active);
    }
}

#[test]
fn zero_probability_keeps_seeded_alerts() {
    let sched = Arc::new(VirtualScheduler::new());
    let dash = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &config(0.0, 10)).unwrap();
    sched.advance(Duration::from_secs(300)).unwrap();
    let ids: Vec<_> = dash
        .security()
        .with(|p| p.alerts.iter().map(|a| a.id.clone()).collect())
        .unwrap();
    assert_eq!(ids, ["SEC001", "SEC002", "SEC003"]);
}

#[test]
fn small_capacity_trims_seed() {
    let sched = Arc::new(VirtualScheduler::new());
    let dash = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &config(0.0, 2)).unwrap();
    assert_eq!(dash.security().with(|p| p.alerts.len()).unwrap(), 2);
}
