//! Latest readings shared between the sampling loop and the status endpoint.
//!
//! [`SensorState`] is a plain `Copy` record.  [`SharedState`] wraps it in a
//! single blocking mutex: the sampler builds a complete new generation
//! off to the side and publishes it in one store, so a reader on the HTTP
//! task always sees values from the same cycle.

use core::cell::Cell;
use std::sync::Arc;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

use crate::app::ports::{Measurement, SensorLifecycle};

/// The CO2 sensor's two self-reported flags, kept verbatim.
///
/// Preheating and ready are logically exclusive, but a misbehaving sensor
/// can assert both; the flags are stored and reported as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Co2Status {
    pub is_ready: bool,
    pub is_pre_heating: bool,
}

impl Co2Status {
    /// Fold the flags into a lifecycle phase.
    pub fn lifecycle(self) -> SensorLifecycle {
        match (self.is_pre_heating, self.is_ready) {
            (true, true) => SensorLifecycle::Faulted,
            (true, false) => SensorLifecycle::PreHeating,
            (false, true) => SensorLifecycle::Ready,
            (false, false) => SensorLifecycle::Uninitialized,
        }
    }
}

impl Default for Co2Status {
    /// The sensor preheats from power-on.
    fn default() -> Self {
        Self {
            is_ready: false,
            is_pre_heating: true,
        }
    }
}

/// Point-in-time record of every sensor's latest reading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorState {
    /// Temperature (°C).
    pub temperature_c: f32,
    /// Relative humidity (%).
    pub humidity_prc: f32,
    /// CO2 concentration (ppm).
    pub co2_ppm: i32,
    pub co2_status: Co2Status,
    /// CO concentration (ppm).
    pub co_ppm: f32,
    /// Number of completed sampling cycles published so far.
    pub generation: u64,
}

impl SensorState {
    /// Overwrite the fields the measurement covers.
    pub fn apply(&mut self, measurement: &Measurement) {
        match *measurement {
            Measurement::Climate {
                temperature_c,
                humidity_prc,
            } => {
                self.temperature_c = temperature_c;
                self.humidity_prc = humidity_prc;
            }
            Measurement::Co2 { ppm, status } => {
                self.co2_ppm = ppm;
                self.co2_status = status;
            }
            Measurement::Co { ppm } => {
                self.co_ppm = ppm;
            }
        }
    }
}

/// Cloneable handle to the process-lifetime state record.
#[derive(Clone)]
pub struct SharedState {
    inner: Arc<Mutex<CriticalSectionRawMutex, Cell<SensorState>>>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::with_initial(SensorState::default())
    }

    pub fn with_initial(state: SensorState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Cell::new(state))),
        }
    }

    /// Copy out the latest complete generation.
    pub fn load(&self) -> SensorState {
        self.inner.lock(Cell::get)
    }

    /// Replace the record in one step.
    pub fn publish(&self, state: SensorState) {
        self.inner.lock(|cell| cell.set(state));
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
