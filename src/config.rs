//! System configuration parameters
//!
//! All tunable parameters for the EnvNode system.
//! Values can be overridden via NVS (non-volatile storage); see
//! [`crate::adapters::nvs`].

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::thresholds::Thresholds;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    // --- Timing ---
    /// Interval between two sampling cycles (milliseconds)
    pub sensors_update_interval_ms: u32,

    // --- CO calibration (MQ-7) ---
    /// Number of warm readings averaged into the R0 baseline
    pub calibration_sample_count: u8,
    /// Reference factor each calibration sample divides Rs by
    /// (Rs/R0 in clean air for the MQ-7).
    pub calibration_reference: f32,
    /// Regression curve `ppm = A * ratio^B`: A
    pub co_regression_a: f32,
    /// Regression curve `ppm = A * ratio^B`: B
    pub co_regression_b: f32,
    /// Load resistor on the MQ-7 board (kOhm)
    pub co_load_resistance_kohm: f32,
    /// ADC reads averaged per `update()`
    pub co_adc_samples: u8,
    /// Delay between the averaged ADC reads (milliseconds)
    pub co_adc_sample_interval_ms: u32,

    // --- ADC ---
    /// ADC full-scale voltage
    pub adc_voltage_resolution: f32,
    /// ADC resolution in bits
    pub adc_bit_resolution: u8,

    // --- CO2 (MH-Z14A) ---
    /// Preheat duration after power-on (milliseconds)
    pub co2_preheat_ms: u32,
    /// Measurement range the sensor is configured for (ppm)
    pub co2_range_ppm: u16,
    /// PWM acquisitions attempted while the pulse reads as zero
    pub co2_pwm_max_attempts: u8,

    // --- Interpretation ---
    /// CO2 and CO severity tables
    pub thresholds: Thresholds,

    // --- Network ---
    /// Status endpoint TCP port
    pub http_port: u16,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            // Timing
            sensors_update_interval_ms: 30 * 1000,

            // CO calibration
            calibration_sample_count: 10,
            calibration_reference: 27.5,
            co_regression_a: 99.042,
            co_regression_b: -1.518,
            co_load_resistance_kohm: 10.0,
            co_adc_samples: 2,
            co_adc_sample_interval_ms: 20,

            // ADC
            adc_voltage_resolution: 3.3,
            adc_bit_resolution: 12,

            // CO2
            co2_preheat_ms: 3 * 60 * 1000,
            co2_range_ppm: 5000,
            co2_pwm_max_attempts: 3,

            thresholds: Thresholds::default(),

            http_port: 80,
        }
    }
}

impl MonitorConfig {
    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1_000..=3_600_000).contains(&self.sensors_update_interval_ms) {
            return Err(ConfigError::ValidationFailed(
                "sensors_update_interval_ms must be 1000–3600000",
            ));
        }
        if self.calibration_sample_count == 0 {
            return Err(ConfigError::ValidationFailed(
                "calibration_sample_count must be at least 1",
            ));
        }
        if !(self.calibration_reference.is_finite() && self.calibration_reference > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "calibration_reference must be positive",
            ));
        }
        if !(self.co_regression_a.is_finite() && self.co_regression_b.is_finite()) {
            return Err(ConfigError::ValidationFailed(
                "co_regression_a/b must be finite",
            ));
        }
        if !(self.co_load_resistance_kohm.is_finite() && self.co_load_resistance_kohm > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "co_load_resistance_kohm must be positive",
            ));
        }
        if self.co_adc_samples == 0 {
            return Err(ConfigError::ValidationFailed(
                "co_adc_samples must be at least 1",
            ));
        }
        if !(self.adc_voltage_resolution.is_finite() && self.adc_voltage_resolution > 0.0) {
            return Err(ConfigError::ValidationFailed(
                "adc_voltage_resolution must be positive",
            ));
        }
        if !(8..=16).contains(&self.adc_bit_resolution) {
            return Err(ConfigError::ValidationFailed(
                "adc_bit_resolution must be 8–16",
            ));
        }
        if self.co2_range_ppm == 0 {
            return Err(ConfigError::ValidationFailed("co2_range_ppm must be non-zero"));
        }
        if self.co2_pwm_max_attempts == 0 {
            return Err(ConfigError::ValidationFailed(
                "co2_pwm_max_attempts must be at least 1",
            ));
        }
        if self.http_port == 0 {
            return Err(ConfigError::ValidationFailed("http_port must be non-zero"));
        }
        Ok(())
    }
}
