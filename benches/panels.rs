use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use railtwin::panels::{PassengerPanel, SecurityPanel, TrainPanel, TransportPanel};
use railtwin::{Dashboard, Panel, Scheduler, SimRng, TwinConfig, VirtualScheduler};

fn bench_panel_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("panels/tick");
    group.throughput(Throughput::Elements(1));

    let now = Utc::now();
    let mut rng = SimRng::from_seed_u64(1);

    let mut trains = TrainPanel::default();
    group.bench_function("trains", |b| {
        b.iter(|| trains.on_tick(&mut rng, black_box(now)));
    });

    let mut passengers = PassengerPanel::default();
    group.bench_function("passengers", |b| {
        b.iter(|| passengers.on_tick(&mut rng, black_box(now)));
    });

    let mut transport = TransportPanel::default();
    group.bench_function("transport", |b| {
        b.iter(|| transport.on_tick(&mut rng, black_box(now)));
    });

    let mut security = SecurityPanel::with_defaults(now);
    group.bench_function("security", |b| {
        b.iter(|| security.on_tick(&mut rng, black_box(now)));
    });

    group.finish();
}

fn bench_virtual_minute(c: &mut Criterion) {
    c.bench_function("dashboard/virtual_minute", |b| {
        b.iter_custom(|iters| {
            // Fresh dashboard per sample so alert feeds and history start from seed.
            let sched = Arc::new(VirtualScheduler::new());
            let config = TwinConfig {
                seed: Some(7),
                ..TwinConfig::default()
            };
            let dash = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &config).unwrap();

            let start = std::time::Instant::now();
            for _ in 0..iters {
                black_box(sched.advance(Duration::from_secs(60)).unwrap());
            }
            let elapsed = start.elapsed();
            drop(dash);
            elapsed
        });
    });
}

fn bench_snapshot_json(c: &mut Criterion) {
    let sched = Arc::new(VirtualScheduler::new());
    let dash = Dashboard::mount(Arc::clone(&sched) as Arc<dyn Scheduler>, &TwinConfig::default()).unwrap();
    sched.advance(Duration::from_secs(30)).unwrap();

    c.bench_function("dashboard/snapshot_json", |b| {
        b.iter(|| {
            let snap = dash.snapshot().unwrap();
            black_box(serde_json::to_string(&snap).unwrap())
        });
    });
}

criterion_group!(benches, bench_panel_ticks, bench_virtual_minute, bench_snapshot_json);
criterion_main!(benches);
