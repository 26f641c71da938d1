//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Sampler / StatusService (domain)
//! ```
//!
//! Sensor drivers, the clock, event sinks and config storage implement
//! these traits.  The domain consumes them via generics or trait objects,
//! so it never touches hardware directly.

use crate::config::MonitorConfig;
use crate::snapshot::SnapshotRecord;
use crate::state::Co2Status;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Warm-up / calibration lifecycle shared by every sensor kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorLifecycle {
    /// Not yet usable (e.g. CO sensor without a baseline).
    Uninitialized,
    /// Readings are produced but not yet trustworthy.
    PreHeating,
    Ready,
    /// The sensor reports a contradictory or broken state.
    Faulted,
}

/// One adapter's contribution to a sampling cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    /// Temperature (°C) and relative humidity (%). NaN on acquisition failure.
    Climate { temperature_c: f32, humidity_prc: f32 },
    /// CO2 concentration plus the sensor's self-reported flags.
    Co2 { ppm: i32, status: Co2Status },
    /// CO concentration derived from the calibrated baseline.
    Co { ppm: f32 },
}

/// Read-side port: the sampling loop calls this once per cycle.
///
/// Implementations never fail: an acquisition fault is reported as a
/// suspect value inside the [`Measurement`].
pub trait SensorPort {
    /// Short driver name for logs.
    fn name(&self) -> &'static str;

    /// Current lifecycle phase.
    fn lifecycle(&self) -> SensorLifecycle;

    /// Acquire a fresh measurement, including any refresh step the
    /// driver protocol requires before the read.
    fn sample(&mut self) -> Measurement;
}

// ───────────────────────────────────────────────────────────────
// Calibration source (driven adapter: gas sensor → calibration unit)
// ───────────────────────────────────────────────────────────────

/// Raw-signal access the calibration unit needs from a gas sensor.
pub trait CalibrationSource {
    /// Refresh the raw signal.  Must precede every sample.
    fn update(&mut self);

    /// Per-sample calibration output for the current raw signal.
    fn calibration_sample(&mut self, reference: f32) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait TimePort {
    fn uptime_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Snapshot provider (driving adapter: HTTP → domain)
// ───────────────────────────────────────────────────────────────

/// Zero-argument snapshot call made by the HTTP status endpoint.
pub trait SnapshotProvider {
    fn snapshot(&self) -> SnapshotRecord;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST validate config values before persisting.
/// Invalid ranges are rejected with [`ConfigError::ValidationFailed`],
/// not silently clamped.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ConfigError::NotFound`] if no stored config exists.
    fn load(&self) -> Result<MonitorConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &MonitorConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed integrity / deserialization check.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl From<ConfigError> for crate::error::Error {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::NotFound => Self::Config("config not found"),
            ConfigError::Corrupted => Self::Config("config corrupted"),
            ConfigError::ValidationFailed(msg) => Self::Config(msg),
            ConfigError::IoError => Self::Config("config I/O error"),
        }
    }
}
