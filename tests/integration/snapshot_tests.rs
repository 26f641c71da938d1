//! Snapshot formatting through the status service.

use envnode::app::ports::{SensorLifecycle, SnapshotProvider};
use envnode::app::sampler::Sampler;
use envnode::app::status::StatusService;
use envnode::sensors::SensorBank;
use envnode::state::{Co2Status, SensorState, SharedState};
use envnode::thresholds::Thresholds;

use crate::mock_hw::{RecordingSink, ScriptedCo2};

fn service_with(state: SensorState) -> StatusService {
    StatusService::new(SharedState::with_initial(state), Thresholds::default())
}

#[test]
fn repeated_snapshots_are_identical() {
    let status = service_with(SensorState {
        temperature_c: 22.5,
        humidity_prc: 48.0,
        co2_ppm: 1450,
        co_ppm: 3.2,
        generation: 4,
        ..SensorState::default()
    });

    let a = status.snapshot().to_json().unwrap();
    let b = status.snapshot().to_json().unwrap();
    assert_eq!(a, b);
}

#[test]
fn json_keys_follow_contract_order() {
    let status = service_with(SensorState {
        temperature_c: 23.0,
        humidity_prc: 41.0,
        co2_ppm: 612,
        co2_status: Co2Status {
            is_ready: true,
            is_pre_heating: false,
        },
        co_ppm: 2.7,
        generation: 1,
    });
    let json = status.snapshot().to_json().unwrap();

    let keys = [
        "\"temperature_c\"",
        "\"humidity_prc\"",
        "\"is_co2_sensor_ready\"",
        "\"is_co2_sensor_pre_heating\"",
        "\"co2_ppm\"",
        "\"co2_meaning\"",
        "\"co_ppm\"",
        "\"co_meaning\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| json.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");
    assert!(json.contains(
        "\"co2_meaning\":\"Concentrations typical of occupied indoor spaces with good air exchange\""
    ));
    assert!(json.contains("\"co_meaning\":\"CO Max prolonged exposure (ASHRAE standard)\""));
    assert!(!json.contains("generation"));
}

#[test]
fn contradictory_co2_flags_are_reported_verbatim() {
    let both = Co2Status {
        is_ready: true,
        is_pre_heating: true,
    };
    let state = SharedState::new();
    let bank: SensorBank = vec![Box::new(ScriptedCo2::new(vec![
        (400, Co2Status::default()),
        (900, both),
    ]))];
    let mut sampler = Sampler::new(bank, state.clone(), 1_000);
    let mut sink = RecordingSink::new();
    sampler.run_cycle(&mut sink);

    let json = StatusService::new(state, Thresholds::default())
        .snapshot()
        .to_json()
        .unwrap();
    assert!(json.contains("\"is_co2_sensor_ready\":true"));
    assert!(json.contains("\"is_co2_sensor_pre_heating\":true"));
    assert!(json.contains("\"co2_ppm\":900"));
    assert_eq!(
        sink.lifecycle_changes(),
        vec![("co2", SensorLifecycle::PreHeating, SensorLifecycle::Faulted)]
    );
}

#[test]
fn out_of_table_readings_omit_meanings() {
    let status = service_with(SensorState {
        co2_ppm: 50_000,
        co_ppm: 20_000.0,
        ..SensorState::default()
    });
    let r = status.snapshot();
    assert_eq!(r.co2_meaning, None);
    assert_eq!(r.co_meaning, None);

    let json = r.to_json().unwrap();
    assert!(!json.contains("meaning"));
    assert!(json.contains("\"co2_ppm\":50000"));
}

#[test]
fn failed_climate_read_serializes_as_null() {
    let status = service_with(SensorState {
        temperature_c: f32::NAN,
        humidity_prc: f32::NAN,
        ..SensorState::default()
    });
    let json = status.snapshot().to_json().unwrap();
    assert!(json.starts_with("{\"temperature_c\":null,\"humidity_prc\":null,"));
}
