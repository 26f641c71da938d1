//! Sampling loop integration tests against mock and simulated sensors.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use envnode::app::events::AppEvent;
use envnode::app::ports::{SensorLifecycle, SnapshotProvider};
use envnode::app::sampler::{Sampler, SamplerPhase};
use envnode::app::status::StatusService;
use envnode::calibration::calibrate;
use envnode::config::MonitorConfig;
use envnode::sensors::SensorBank;
use envnode::sensors::mhz14a::{Mhz14aParams, Mhz14aSensor};
use envnode::sensors::mq7::{Mq7Params, Mq7Sensor};
use envnode::state::{Co2Status, SharedState};
use envnode::thresholds::Thresholds;

use crate::mock_hw::{
    CountingClimate, CountingCo, DeadClimate, NoDelay, RecordingSink, SampleLog, ScriptedCo2,
    VirtualClock, VirtualDelay,
};

const READY: Co2Status = Co2Status {
    is_ready: true,
    is_pre_heating: false,
};

fn counting_bank(clock: &VirtualClock, log: &SampleLog) -> SensorBank {
    vec![
        Box::new(CountingClimate {
            n: 0.0,
            clock: clock.clone(),
            log: Arc::clone(log),
        }),
        Box::new(ScriptedCo2::new(vec![(600, READY)])),
        Box::new(CountingCo {
            n: 0.0,
            clock: clock.clone(),
            log: Arc::clone(log),
        }),
    ]
}

#[test]
fn cadence_matches_configured_interval() {
    let clock = VirtualClock::new();
    let log: SampleLog = Arc::new(Mutex::new(Vec::new()));
    let mut sampler = Sampler::new(counting_bank(&clock, &log), SharedState::new(), 30_000);
    let mut delay = VirtualDelay::new(clock.clone());
    let mut sink = RecordingSink::new();

    for _ in 0..5 {
        sampler.tick(&mut delay, &mut sink);
    }

    assert_eq!(delay.waits_ms, vec![30_000; 5]);
    let climate_times: Vec<u64> = log
        .lock()
        .unwrap()
        .iter()
        .filter(|(name, _)| *name == "climate")
        .map(|(_, t)| *t)
        .collect();
    assert_eq!(climate_times, vec![0, 30_000, 60_000, 90_000, 120_000]);
    for pair in climate_times.windows(2) {
        assert_eq!(pair[1] - pair[0], 30_000);
    }
    assert_eq!(sampler.phase(), SamplerPhase::Idle);
}

#[test]
fn generations_are_consecutive() {
    let clock = VirtualClock::new();
    let log: SampleLog = Arc::new(Mutex::new(Vec::new()));
    let state = SharedState::new();
    let mut sampler = Sampler::new(counting_bank(&clock, &log), state.clone(), 1_000);
    let mut delay = VirtualDelay::new(clock);
    let mut sink = RecordingSink::new();

    for _ in 0..10 {
        sampler.tick(&mut delay, &mut sink);
    }

    assert_eq!(sink.sampled_generations(), (1..=10).collect::<Vec<u64>>());
    assert_eq!(state.load().generation, 10);
}

#[test]
fn sensors_are_read_in_registration_order() {
    let clock = VirtualClock::new();
    let log: SampleLog = Arc::new(Mutex::new(Vec::new()));
    let mut sampler = Sampler::new(counting_bank(&clock, &log), SharedState::new(), 1_000);

    assert_eq!(
        sampler.sensor_names().collect::<Vec<_>>(),
        vec!["climate", "co2", "co"]
    );

    sampler.run_cycle(&mut RecordingSink::new());
    sampler.run_cycle(&mut RecordingSink::new());
    let names: Vec<&str> = log.lock().unwrap().iter().map(|(n, _)| *n).collect();
    assert_eq!(names, vec!["climate", "co", "climate", "co"]);
}

#[test]
fn failed_climate_read_is_published_and_loop_continues() {
    let state = SharedState::new();
    let bank: SensorBank = vec![
        Box::new(DeadClimate),
        Box::new(ScriptedCo2::new(vec![(750, READY)])),
    ];
    let mut sampler = Sampler::new(bank, state.clone(), 1_000);
    let mut delay = VirtualDelay::new(VirtualClock::new());
    let mut sink = RecordingSink::new();

    sampler.tick(&mut delay, &mut sink);
    sampler.tick(&mut delay, &mut sink);

    let s = state.load();
    assert!(s.temperature_c.is_nan());
    assert!(s.humidity_prc.is_nan());
    assert_eq!(s.co2_ppm, 750);
    assert_eq!(s.generation, 2);
}

#[test]
fn lifecycle_transitions_are_reported_once() {
    let preheating = Co2Status::default();
    let bank: SensorBank = vec![Box::new(ScriptedCo2::new(vec![
        (0, preheating),
        (400, preheating),
        (600, READY),
        (610, READY),
    ]))];
    let mut sampler = Sampler::new(bank, SharedState::new(), 1_000);
    let mut sink = RecordingSink::new();

    for _ in 0..4 {
        sampler.run_cycle(&mut sink);
    }

    assert_eq!(
        sink.lifecycle_changes(),
        vec![("co2", SensorLifecycle::PreHeating, SensorLifecycle::Ready)]
    );
}

#[test]
fn start_announces_interval() {
    let mut sampler = Sampler::new(Vec::new(), SharedState::new(), 30_000);
    let mut sink = RecordingSink::new();
    sampler.start(&mut sink);
    assert_eq!(sink.events, vec![AppEvent::Started { interval_ms: 30_000 }]);
}

#[test]
fn real_co2_driver_leaves_preheat_after_three_minutes() {
    let config = MonitorConfig::default();
    let clock = VirtualClock::new();
    let state = SharedState::new();
    let bank: SensorBank = vec![Box::new(Mhz14aSensor::new(
        0,
        Mhz14aParams::from_config(&config),
        clock.clone(),
    ))];
    let mut sampler = Sampler::new(bank, state.clone(), config.sensors_update_interval_ms);
    let mut delay = VirtualDelay::new(clock.clone());
    let mut sink = RecordingSink::new();

    // Cycles at 0 s, 30 s, ... 150 s are still preheating.
    for _ in 0..6 {
        sampler.tick(&mut delay, &mut sink);
        assert!(state.load().co2_status.is_pre_heating);
        assert!(!state.load().co2_status.is_ready);
    }
    // 180 s: preheat window elapsed.
    sampler.tick(&mut delay, &mut sink);
    let s = state.load();
    assert!(!s.co2_status.is_pre_heating);
    assert!(s.co2_status.is_ready);
    assert_eq!(
        sink.lifecycle_changes(),
        vec![("mhz14a", SensorLifecycle::PreHeating, SensorLifecycle::Ready)]
    );
}

#[test]
fn calibrated_co_driver_publishes_positive_concentration() {
    let config = MonitorConfig::default();
    let mut mq7 = Mq7Sensor::new(0, Mq7Params::from_config(&config), NoDelay);
    let baseline = calibrate(
        &mut mq7,
        config.calibration_sample_count,
        config.calibration_reference,
    )
    .unwrap();
    assert_eq!(baseline.samples, 10);
    mq7.set_baseline(baseline);

    let state = SharedState::new();
    let bank: SensorBank = vec![Box::new(mq7)];
    let mut sampler = Sampler::new(bank, state.clone(), 1_000);
    sampler.run_cycle(&mut RecordingSink::new());

    let co = state.load().co_ppm;
    assert!(co.is_finite() && co > 0.0, "co_ppm = {co}");
}

#[test]
fn readers_never_observe_a_torn_generation() {
    let clock = VirtualClock::new();
    let log: SampleLog = Arc::new(Mutex::new(Vec::new()));
    let state = SharedState::new();
    let status = StatusService::new(state.clone(), Thresholds::default());
    let mut sampler = Sampler::new(counting_bank(&clock, &log), state, 0);

    let done = Arc::new(AtomicBool::new(false));
    let reader = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut checked = 0u32;
            loop {
                let r = status.snapshot();
                // Climate and CO counters advance together within a cycle.
                assert_eq!(r.temperature_c, r.humidity_prc);
                assert_eq!(r.temperature_c, r.co_ppm);
                checked += 1;
                if done.load(Ordering::SeqCst) {
                    break checked;
                }
            }
        })
    };

    let mut sink = RecordingSink::new();
    for _ in 0..2_000 {
        sampler.run_cycle(&mut sink);
    }
    done.store(true, Ordering::SeqCst);
    assert!(reader.join().unwrap() > 0);
}
