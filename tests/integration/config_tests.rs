//! Config persistence flow as run at boot.

use envnode::adapters::nvs::NvsAdapter;
use envnode::app::ports::{ConfigError, ConfigPort};
use envnode::config::MonitorConfig;
use envnode::thresholds::ThresholdTable;

/// Boot-time resolution: stored config if usable, defaults otherwise.
fn resolve(nvs: &NvsAdapter) -> MonitorConfig {
    nvs.load().unwrap_or_default()
}

#[test]
fn first_boot_falls_back_to_defaults() {
    let nvs = NvsAdapter::new().unwrap();
    assert_eq!(nvs.load(), Err(ConfigError::NotFound));
    let cfg = resolve(&nvs);
    assert_eq!(cfg.sensors_update_interval_ms, 30_000);
    assert_eq!(cfg.calibration_sample_count, 10);
    assert_eq!(cfg.calibration_reference, 27.5);
    assert_eq!(cfg.http_port, 80);
}

#[test]
fn custom_thresholds_survive_persistence() {
    let mut nvs = NvsAdapter::new().unwrap();
    let mut cfg = MonitorConfig::default();
    cfg.thresholds.co = ThresholdTable::new(&[(25, "Elevated"), (100, "Evacuate")]).unwrap();
    nvs.save(&cfg).unwrap();

    let loaded = resolve(&nvs);
    assert_eq!(loaded.thresholds.co.lookup(30), Some("Evacuate"));
    assert_eq!(loaded.thresholds.co.lookup(101), None);
    assert_eq!(loaded.thresholds.co2, MonitorConfig::default().thresholds.co2);
}

#[test]
fn corrupted_blob_falls_back_to_defaults() {
    let mut nvs = NvsAdapter::new().unwrap();
    nvs.sim_write_raw(&[0x01]);
    assert_eq!(nvs.load(), Err(ConfigError::Corrupted));
    assert_eq!(resolve(&nvs), MonitorConfig::default());
}
