//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (UART / USB-CDC through `esp_idf_logger` on device).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Sampled(s) => {
                info!(
                    "SAMPLE | temperature={:.1}\u{00b0}C humidity={:.1}% | \
                     co2Ppm={} ready={} preheating={} | coPpm={:.2} | gen={}",
                    s.temperature_c,
                    s.humidity_prc,
                    s.co2_ppm,
                    s.co2_status.is_ready,
                    s.co2_status.is_pre_heating,
                    s.co_ppm,
                    s.generation,
                );
            }
            AppEvent::LifecycleChanged { sensor, from, to } => {
                info!("SENSOR | {} {:?} -> {:?}", sensor, from, to);
            }
            AppEvent::Calibrated(cal) => {
                info!("CALIB | R0={:.3} from {} samples", cal.r0, cal.samples);
            }
            AppEvent::Started { interval_ms } => {
                info!("START | interval={}ms", interval_ms);
            }
            AppEvent::ConnectivityFailed => {
                warn!("NET | offline, status endpoint not started");
            }
            AppEvent::StatusEndpointStarted { port } => {
                info!("NET | status endpoint on port {}", port);
            }
        }
    }
}
