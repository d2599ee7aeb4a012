//! Every walked field stays inside its domain for many seeds and ticks.

use chrono::Utc;

use railtwin::panels::{climate, immersive, passengers, security, transport, ai_center};
use railtwin::panels::{AiCenterPanel, ClimatePanel, ImmersivePanel, PassengerPanel, SecurityPanel, TransportPanel};
use railtwin::{Panel, ScriptedRandom, SimRng};

const SEEDS: u64 = 32;
const TICKS: usize = 300;

fn each_seed(mut check: impl FnMut(&mut SimRng)) {
    for seed in 0..SEEDS {
        let mut rng = SimRng::from_seed_u64(seed);
        check(&mut rng);
    }
}

#[test]
fn climate_fields_stay_in_domain() {
    each_seed(|rng| {
        let mut panel = ClimatePanel::default();
        for _ in 0..TICKS {
            panel.on_tick(rng, Utc::now());
            for s in &panel.stations {
                assert!(climate::TEMPERATURE.bounds().contains(s.temperature));
                assert!(climate::HUMIDITY.bounds().contains(s.humidity));
                assert!(climate::WIND_SPEED.bounds().contains(s.wind_speed));
                assert!(climate::VISIBILITY.bounds().contains(s.visibility));
            }
        }
    });
}

#[test]
fn passenger_fields_stay_in_domain() {
    each_seed(|rng| {
        let mut panel = PassengerPanel::default();
        for _ in 0..TICKS {
            panel.on_tick(rng, Utc::now());
            assert!(passengers::SATISFACTION.bounds().contains(panel.metrics.satisfaction));
            for f in &panel.flows {
                assert!(passengers::INBOUND.bounds().contains(f64::from(f.inbound)));
                assert!(passengers::OUTBOUND.bounds().contains(f64::from(f.outbound)));
                assert!(passengers::PREDICTED_WAIT.bounds().contains(f.predicted_wait));
            }
            for p in &panel.personas {
                assert!(passengers::PERSONA_SATISFACTION.bounds().contains(p.satisfaction));
            }
        }
    });
}

#[test]
fn transport_and_immersive_stay_in_domain() {
    each_seed(|rng| {
        let mut modes = TransportPanel::default();
        let mut xr = ImmersivePanel::default();
        for _ in 0..TICKS {
            modes.on_tick(rng, Utc::now());
            xr.on_tick(rng, Utc::now());
            for m in &modes.modes {
                assert!(m.current_load <= m.capacity);
                assert!(transport::EFFICIENCY.bounds().contains(m.efficiency));
            }
            assert!(transport::SYSTEM_EFFICIENCY.bounds().contains(modes.ecosystem.system_efficiency));
            assert!(immersive::SYSTEM_LOAD.bounds().contains(f64::from(xr.metrics.system_load)));
            assert!(immersive::RENDER_QUALITY.bounds().contains(f64::from(xr.metrics.render_quality)));
        }
    });
}

#[test]
fn security_and_ai_metrics_stay_in_domain() {
    each_seed(|rng| {
        let mut sec = SecurityPanel::with_defaults(Utc::now());
        let mut ai = AiCenterPanel::default();
        for _ in 0..TICKS {
            sec.on_tick(rng, Utc::now());
            ai.on_tick(rng, Utc::now());
            assert!(security::SYSTEM_INTEGRITY.bounds().contains(sec.metrics.system_integrity));
            assert!(security::NETWORK_SECURITY.bounds().contains(sec.metrics.network_security));
            assert!(sec.alerts.len() <= security::DEFAULT_ALERT_CAPACITY);
            assert!(ai_center::ACCURACY.bounds().contains(ai.metrics.accuracy));
            assert!(ai_center::AVERAGE_RESPONSE.bounds().contains(ai.metrics.average_response_s));
        }
    });
}

#[test]
fn extreme_draws_pin_to_edges() {
    for unit in [0.0, ScriptedRandom::MAX_UNIT] {
        let mut rng = ScriptedRandom::constant(unit);
        let mut panel = ClimatePanel::default();
        for _ in 0..100 {
            panel.on_tick(&mut rng, Utc::now());
        }
        let expected = if unit == 0.0 { 15.0 } else { 35.0 };
        for s in &panel.stations {
            assert!((s.temperature - expected).abs() < 1e-9);
            assert!(!s.temperature.is_nan());
        }
    }
}
