//! One-shot baseline calibration for the CO gas sensor.
//!
//! Runs synchronously at boot before the sampling loop starts.  Each of
//! the `sample_count` iterations refreshes the raw signal and takes one
//! calibration sample; the baseline is their arithmetic mean.  There is
//! no outlier rejection: one noisy sample skews the result.

use log::{debug, info};

use crate::app::ports::CalibrationSource;
use crate::error::{Error, Result};

/// Baseline derived at boot and held by the CO driver afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationResult {
    /// Baseline sensor resistance in clean air (R0).
    pub r0: f32,
    /// Number of samples averaged.
    pub samples: u8,
}

/// Average `sample_count` calibration samples taken with `reference`.
pub fn calibrate(
    source: &mut impl CalibrationSource,
    sample_count: u8,
    reference: f32,
) -> Result<CalibrationResult> {
    if sample_count == 0 {
        return Err(Error::Config("calibration sample count must be at least 1"));
    }

    let mut sum = 0.0_f32;
    for i in 1..=sample_count {
        source.update();
        let sample = source.calibration_sample(reference);
        debug!("calibration: sample {}/{} = {}", i, sample_count, sample);
        sum += sample;
    }

    let r0 = sum / f32::from(sample_count);
    info!("calibration: R0={} from {} samples", r0, sample_count);
    Ok(CalibrationResult {
        r0,
        samples: sample_count,
    })
}
