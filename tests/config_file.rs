use std::io::Write;

use railtwin::TwinConfig;

#[test]
fn loads_partial_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "seed": 99,
            "intervals": {{ "trains": 250, "header": 500 }},
            "alerts": {{ "capacity": 4 }},
            "simulator": {{ "running_ms": 100, "analyzing_ms": 200 }}
        }}"#
    )
    .unwrap();

    let cfg = TwinConfig::load(file.path()).unwrap();
    assert_eq!(cfg.seed, Some(99));
    assert_eq!(cfg.intervals.trains, 250);
    assert_eq!(cfg.intervals.header, 500);
    assert_eq!(cfg.intervals.climate, 5000);
    assert_eq!(cfg.alerts.capacity, 4);
    assert!((cfg.alerts.spawn_probability - 0.1).abs() < f64::EPSILON);
    assert_eq!(cfg.simulator.history_capacity, 5);
}

#[test]
fn invalid_values_report_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twin.json");
    std::fs::write(&path, r#"{"alerts": {"spawn_probability": 2.0}}"#).unwrap();

    let err = TwinConfig::load(&path).unwrap_err();
    assert!(err.is_config());
    assert!(err.to_string().contains("twin.json"));
}

#[test]
fn missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TwinConfig::load(dir.path().join("absent.json")).unwrap_err();
    assert!(err.is_config());
}

#[test]
fn malformed_json_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ seed: ").unwrap();
    assert!(TwinConfig::load(&path).unwrap_err().is_config());
}
