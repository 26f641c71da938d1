//! Mock hardware for integration tests.
//!
//! Scripted sensors, a virtual clock that only moves when the virtual
//! delay is waited on, and a sink that records every emitted event.
//! Everything is `Send` so it can sit in a `SensorBank`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use embedded_hal::delay::DelayNs;
use envnode::app::events::AppEvent;
use envnode::app::ports::{EventSink, Measurement, SensorLifecycle, SensorPort, TimePort};
use envnode::state::Co2Status;

// ── Virtual time ──────────────────────────────────────────────

/// Shared monotonic clock in nanoseconds.
#[derive(Clone, Default)]
pub struct VirtualClock {
    ns: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance_ns(&self, ns: u64) {
        self.ns.fetch_add(ns, Ordering::SeqCst);
    }

    pub fn now_ms(&self) -> u64 {
        self.ns.load(Ordering::SeqCst) / 1_000_000
    }
}

impl TimePort for VirtualClock {
    fn uptime_ms(&self) -> u64 {
        self.now_ms()
    }
}

/// Delay that advances a [`VirtualClock`] instead of sleeping.
pub struct VirtualDelay {
    clock: VirtualClock,
    /// Every `delay_ms` request, in call order.
    pub waits_ms: Vec<u32>,
}

impl VirtualDelay {
    pub fn new(clock: VirtualClock) -> Self {
        Self {
            clock,
            waits_ms: Vec::new(),
        }
    }
}

impl DelayNs for VirtualDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.advance_ns(u64::from(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
        self.clock.advance_ns(u64::from(ms) * 1_000_000);
    }
}

// ── Sensors ───────────────────────────────────────────────────

/// Shared log of `(sensor name, virtual ms)` for every sample taken.
pub type SampleLog = Arc<Mutex<Vec<(&'static str, u64)>>>;

/// Climate sensor whose n-th sample reads `(n, n)`.
pub struct CountingClimate {
    pub n: f32,
    pub clock: VirtualClock,
    pub log: SampleLog,
}

impl SensorPort for CountingClimate {
    fn name(&self) -> &'static str {
        "climate"
    }

    fn lifecycle(&self) -> SensorLifecycle {
        SensorLifecycle::Ready
    }

    fn sample(&mut self) -> Measurement {
        self.n += 1.0;
        self.log
            .lock()
            .unwrap()
            .push((self.name(), self.clock.now_ms()));
        Measurement::Climate {
            temperature_c: self.n,
            humidity_prc: self.n,
        }
    }
}

/// CO sensor whose n-th sample reads `n` ppm.
pub struct CountingCo {
    pub n: f32,
    pub clock: VirtualClock,
    pub log: SampleLog,
}

impl SensorPort for CountingCo {
    fn name(&self) -> &'static str {
        "co"
    }

    fn lifecycle(&self) -> SensorLifecycle {
        SensorLifecycle::Ready
    }

    fn sample(&mut self) -> Measurement {
        self.n += 1.0;
        self.log
            .lock()
            .unwrap()
            .push((self.name(), self.clock.now_ms()));
        Measurement::Co { ppm: self.n }
    }
}

/// CO2 sensor replaying a fixed script, then repeating its last entry.
pub struct ScriptedCo2 {
    pub script: Vec<(i32, Co2Status)>,
    pub pos: usize,
}

impl ScriptedCo2 {
    pub fn new(script: Vec<(i32, Co2Status)>) -> Self {
        Self { script, pos: 0 }
    }

    fn current(&self) -> (i32, Co2Status) {
        let last = self.script.len().saturating_sub(1);
        self.script[self.pos.min(last)]
    }
}

impl SensorPort for ScriptedCo2 {
    fn name(&self) -> &'static str {
        "co2"
    }

    fn lifecycle(&self) -> SensorLifecycle {
        self.current().1.lifecycle()
    }

    fn sample(&mut self) -> Measurement {
        self.pos += 1;
        let (ppm, status) = self.current();
        Measurement::Co2 { ppm, status }
    }
}

/// Climate sensor that always fails the way the DHT11 driver does.
pub struct DeadClimate;

impl SensorPort for DeadClimate {
    fn name(&self) -> &'static str {
        "dead-climate"
    }

    fn lifecycle(&self) -> SensorLifecycle {
        SensorLifecycle::Ready
    }

    fn sample(&mut self) -> Measurement {
        Measurement::Climate {
            temperature_c: f32::NAN,
            humidity_prc: f32::NAN,
        }
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sampled_generations(&self) -> Vec<u64> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Sampled(s) => Some(s.generation),
                _ => None,
            })
            .collect()
    }

    pub fn lifecycle_changes(&self) -> Vec<(&'static str, SensorLifecycle, SensorLifecycle)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::LifecycleChanged { sensor, from, to } => Some((*sensor, *from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

/// No-op delay for driver-level tests.
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}
