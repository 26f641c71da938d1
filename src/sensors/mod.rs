//! Sensor subsystem: one driver per attached sensor.
//!
//! Every driver implements [`SensorPort`](crate::app::ports::SensorPort),
//! so the sampling loop is written once against the trait.  Drivers never
//! return errors: acquisition faults become suspect values.
//!
//! | Driver    | Quantity              | Interface          | Lifecycle                  |
//! |-----------|-----------------------|--------------------|----------------------------|
//! | `dht11`   | temperature, humidity | single-wire, GPIO  | always ready               |
//! | `mhz14a`  | CO2                   | PWM, GPIO          | preheat → ready            |
//! | `mq7`     | CO                    | analog, ADC1       | uncalibrated → ready       |
//!
//! ## Dual-target design
//!
//! On ESP-IDF the drivers talk to the pins listed in [`crate::pins`].
//! On host/test each driver reads from static atomics that tests inject
//! values into (`sim_set_*`).

pub mod dht11;
pub mod mhz14a;
pub mod mq7;

use crate::app::ports::SensorPort;

/// Sensors in sampling order.
pub type SensorBank = Vec<Box<dyn SensorPort + Send>>;
