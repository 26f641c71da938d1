//! Serializable status record served by the HTTP endpoint.
//!
//! Field names and order form the wire contract:
//!
//! ```json
//! {"temperature_c":23.0,"humidity_prc":41.0,"is_co2_sensor_ready":true,
//!  "is_co2_sensor_pre_heating":false,"co2_ppm":612,
//!  "co2_meaning":"...","co_ppm":2.7,"co_meaning":"..."}
//! ```
//!
//! The `*_meaning` keys are omitted when the reading lies above every
//! threshold.  Non-finite floats serialize as `null`.

use serde::Serialize;

use crate::state::SensorState;
use crate::thresholds::{Description, Thresholds};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRecord {
    pub temperature_c: f32,
    pub humidity_prc: f32,
    pub is_co2_sensor_ready: bool,
    pub is_co2_sensor_pre_heating: bool,
    pub co2_ppm: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co2_meaning: Option<Description>,
    pub co_ppm: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub co_meaning: Option<Description>,
}

impl SnapshotRecord {
    /// Annotate a state record with threshold descriptions.  Pure.
    pub fn from_state(state: &SensorState, thresholds: &Thresholds) -> Self {
        Self {
            temperature_c: state.temperature_c,
            humidity_prc: state.humidity_prc,
            is_co2_sensor_ready: state.co2_status.is_ready,
            is_co2_sensor_pre_heating: state.co2_status.is_pre_heating,
            co2_ppm: state.co2_ppm,
            co2_meaning: describe(thresholds.co2.lookup(state.co2_ppm)),
            co_ppm: state.co_ppm,
            co_meaning: co_lookup_key(state.co_ppm)
                .and_then(|key| describe(thresholds.co.lookup(key))),
        }
    }

    pub fn to_json(&self) -> Result<std::string::String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// CO readings are looked up by their nearest integer, half away from zero.
/// The reported value stays unrounded.  Non-finite readings have no key:
/// no bound is `>=` NaN, and infinities lie outside every table.
pub fn co_lookup_key(co_ppm: f32) -> Option<i32> {
    co_ppm.is_finite().then(|| co_ppm.round() as i32)
}

fn describe(text: Option<&str>) -> Option<Description> {
    text.and_then(|t| Description::try_from(t).ok())
}
