//! Outbound application events.
//!
//! The [`Sampler`](super::sampler::Sampler) and the boot sequence emit
//! these through the [`EventSink`](super::ports::EventSink) port.
//! Adapters on the other side decide what to do with them.

use crate::calibration::CalibrationResult;
use crate::state::SensorState;

use super::ports::SensorLifecycle;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The sampling loop has started (carries the configured interval).
    Started { interval_ms: u32 },

    /// The CO sensor baseline was established.
    Calibrated(CalibrationResult),

    /// A sampling cycle completed and its generation was published.
    Sampled(SensorState),

    /// A sensor moved between lifecycle phases.
    LifecycleChanged {
        sensor: &'static str,
        from: SensorLifecycle,
        to: SensorLifecycle,
    },

    /// The network could not be brought up; the status endpoint is offline.
    ConnectivityFailed,

    /// The HTTP status endpoint is listening.
    StatusEndpointStarted { port: u16 },
}
