//! Sampling loop: the single writer of [`SharedState`].
//!
//! Each cycle reads every registered sensor in registration order,
//! folds the measurements into a working copy of the last published
//! record, and publishes the copy in one store.  The loop then waits the
//! configured interval through an injected [`DelayNs`].
//!
//! ```text
//!   ┌─────────┐  tick()  ┌──────────┐  publish  ┌─────────────┐
//!   │  Idle   │ ───────▶ │ Sampling │ ────────▶ │ SharedState │
//!   └─────────┘ ◀─────── └──────────┘           └─────────────┘
//!        ▲      delay_ms(interval)
//! ```
//!
//! Sensor faults never stop the loop: drivers report suspect values and
//! those are published as-is.

use embedded_hal::delay::DelayNs;
use log::{debug, info};

use crate::sensors::SensorBank;
use crate::state::{SensorState, SharedState};

use super::events::AppEvent;
use super::ports::{EventSink, SensorLifecycle};

/// Where the loop currently is within a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerPhase {
    /// Waiting out the interval (or not yet started).
    Idle,
    /// Reading sensors.
    Sampling,
}

pub struct Sampler {
    sensors: SensorBank,
    state: SharedState,
    interval_ms: u32,
    phase: SamplerPhase,
    /// Last observed lifecycle per sensor, same order as `sensors`.
    lifecycles: Vec<SensorLifecycle>,
}

impl Sampler {
    /// Build a sampler over `sensors` (read in this order) publishing to `state`.
    pub fn new(sensors: SensorBank, state: SharedState, interval_ms: u32) -> Self {
        let lifecycles = sensors.iter().map(|s| s.lifecycle()).collect();
        Self {
            sensors,
            state,
            interval_ms,
            phase: SamplerPhase::Idle,
            lifecycles,
        }
    }

    pub fn phase(&self) -> SamplerPhase {
        self.phase
    }

    /// Driver names in sampling order.
    pub fn sensor_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.sensors.iter().map(|s| s.name())
    }

    /// Announce the loop.  Call once before the first tick.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        info!(
            "Sampler started: {} sensors, interval {} ms",
            self.sensors.len(),
            self.interval_ms
        );
        sink.emit(&AppEvent::Started {
            interval_ms: self.interval_ms,
        });
    }

    /// Read every sensor once and publish the resulting generation.
    pub fn run_cycle(&mut self, sink: &mut impl EventSink) -> SensorState {
        self.phase = SamplerPhase::Sampling;

        let mut next = self.state.load();
        for (sensor, last) in self.sensors.iter_mut().zip(self.lifecycles.iter_mut()) {
            let measurement = sensor.sample();
            debug!("Sampler: {} -> {:?}", sensor.name(), measurement);
            next.apply(&measurement);

            let now = sensor.lifecycle();
            if now != *last {
                sink.emit(&AppEvent::LifecycleChanged {
                    sensor: sensor.name(),
                    from: *last,
                    to: now,
                });
                *last = now;
            }
        }
        next.generation = next.generation.wrapping_add(1);
        self.state.publish(next);

        self.phase = SamplerPhase::Idle;
        next
    }

    /// One full period: cycle, report, then wait the interval.
    pub fn tick(&mut self, delay: &mut impl DelayNs, sink: &mut impl EventSink) -> SensorState {
        let published = self.run_cycle(sink);
        sink.emit(&AppEvent::Sampled(published));
        delay.delay_ms(self.interval_ms);
        published
    }

    /// Sample forever.
    pub fn run(mut self, mut delay: impl DelayNs, mut sink: impl EventSink) -> ! {
        self.start(&mut sink);
        loop {
            self.tick(&mut delay, &mut sink);
        }
    }
}
