//! MQ-7 carbon monoxide sensor driver.
//!
//! Reads the analog output through an ADC1 channel and converts it with
//! the usual MQ-series model:
//!
//! ```text
//!   V   = mean(adc) × Vref / (2^bits − 1)
//!   Rs  = Vref × RL / V − RL                  (clamped ≥ 0)
//!   ppm = A × (Rs / R0)^B                     (clamped ≥ 0)
//! ```
//!
//! Two-step protocol: [`Mq7Sensor::update`] refreshes the voltage and must
//! run immediately before [`Mq7Sensor::read`].  `R0` comes from
//! [`crate::calibration::calibrate`]; reading without it is allowed and
//! produces meaningless values.
//!
//! ## Dual-target design
//!
//! Reads go through [`hw_init::adc1_read`]: the oneshot API on ESP-IDF,
//! an injectable count on host (`hw_init::sim_set_adc1`).  A failed
//! conversion counts as 0, which drives Rs to infinity and the reading
//! to NaN.

use embedded_hal::delay::DelayNs;
use log::debug;

use crate::app::ports::{CalibrationSource, Measurement, SensorLifecycle, SensorPort};
use crate::calibration::CalibrationResult;
use crate::config::MonitorConfig;
use crate::drivers::hw_init;

/// Electrical and curve constants.
#[derive(Debug, Clone, Copy)]
pub struct Mq7Params {
    pub voltage_resolution: f32,
    pub adc_bits: u8,
    pub load_resistance_kohm: f32,
    pub regression_a: f32,
    pub regression_b: f32,
    pub adc_samples: u8,
    pub adc_sample_interval_ms: u32,
}

impl Mq7Params {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            voltage_resolution: config.adc_voltage_resolution,
            adc_bits: config.adc_bit_resolution,
            load_resistance_kohm: config.co_load_resistance_kohm,
            regression_a: config.co_regression_a,
            regression_b: config.co_regression_b,
            adc_samples: config.co_adc_samples,
            adc_sample_interval_ms: config.co_adc_sample_interval_ms,
        }
    }
}

impl Default for Mq7Params {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

/// Convert a (possibly averaged) ADC count to volts.
pub fn adc_to_voltage(raw: f32, voltage_resolution: f32, bits: u8) -> f32 {
    let full_scale = ((1u32 << bits) - 1) as f32;
    raw * voltage_resolution / full_scale
}

/// Sensor resistance from the divider voltage.  Negative results clamp to
/// zero; a zero voltage yields infinity, which is passed on.
pub fn sensor_resistance(volts: f32, voltage_resolution: f32, load_kohm: f32) -> f32 {
    let rs = (voltage_resolution * load_kohm) / volts - load_kohm;
    if rs < 0.0 { 0.0 } else { rs }
}

/// Exponential regression `A × ratio^B`, negative results clamped to zero.
/// NaN propagates unchanged.
pub fn ppm_from_ratio(ratio: f32, a: f32, b: f32) -> f32 {
    let ratio = if ratio <= 0.0 { 0.0 } else { ratio };
    let ppm = a * ratio.powf(b);
    if ppm < 0.0 { 0.0 } else { ppm }
}

pub struct Mq7Sensor<D: DelayNs> {
    params: Mq7Params,
    delay: D,
    sensor_volt: f32,
    baseline: Option<CalibrationResult>,
    adc_channel: u32,
}

impl<D: DelayNs> Mq7Sensor<D> {
    pub fn new(adc_channel: u32, params: Mq7Params, delay: D) -> Self {
        Self {
            params,
            delay,
            sensor_volt: 0.0,
            baseline: None,
            adc_channel,
        }
    }

    /// Install the calibration baseline.  Held for the rest of the process.
    pub fn set_baseline(&mut self, baseline: CalibrationResult) {
        self.baseline = Some(baseline);
    }

    /// Refresh the sensor voltage from `adc_samples` averaged reads.
    pub fn update(&mut self) {
        let samples = self.params.adc_samples.max(1);
        let mut sum = 0.0_f32;
        for _ in 0..samples {
            sum += f32::from(self.read_adc());
            self.delay.delay_ms(self.params.adc_sample_interval_ms);
        }
        let avg = sum / f32::from(samples);
        self.sensor_volt = adc_to_voltage(avg, self.params.voltage_resolution, self.params.adc_bits);
    }

    pub fn sensor_resistance(&self) -> f32 {
        sensor_resistance(
            self.sensor_volt,
            self.params.voltage_resolution,
            self.params.load_resistance_kohm,
        )
    }

    /// CO concentration from the last update.  R0 is 0 until calibrated.
    pub fn read(&self) -> f32 {
        let r0 = self.baseline.map_or(0.0, |b| b.r0);
        let ratio = self.sensor_resistance() / r0;
        ppm_from_ratio(ratio, self.params.regression_a, self.params.regression_b)
    }

    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(self.adc_channel).unwrap_or_else(|e| {
            debug!("mq7: ADC1 CH{} {}", self.adc_channel, e);
            0
        })
    }
}

impl<D: DelayNs> CalibrationSource for Mq7Sensor<D> {
    fn update(&mut self) {
        Mq7Sensor::update(self);
    }

    fn calibration_sample(&mut self, reference: f32) -> f32 {
        let r0 = self.sensor_resistance() / reference;
        if r0 < 0.0 { 0.0 } else { r0 }
    }
}

impl<D: DelayNs> SensorPort for Mq7Sensor<D> {
    fn name(&self) -> &'static str {
        "mq7"
    }

    fn lifecycle(&self) -> SensorLifecycle {
        if self.baseline.is_some() {
            SensorLifecycle::Ready
        } else {
            SensorLifecycle::Uninitialized
        }
    }

    fn sample(&mut self) -> Measurement {
        self.update();
        Measurement::Co { ppm: self.read() }
    }
}
