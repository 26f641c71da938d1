//! DHT11 temperature / relative-humidity sensor driver.
//!
//! Single-wire protocol: the host pulls the line low for 18 ms, releases
//! it, and the sensor answers with an 80 µs low / 80 µs high preamble
//! followed by 40 data bits.  Each bit is a ~50 µs low followed by a high
//! pulse of ~27 µs (`0`) or ~70 µs (`1`).
//!
//! ```text
//!  byte 0        byte 1         byte 2        byte 3          byte 4
//!  RH integer    RH decimal     T integer     T decimal|sign  checksum
//! ```
//!
//! Any protocol failure yields NaN for both fields.  Nothing downstream
//! checks for it.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use crate::app::ports::{Measurement, SensorLifecycle, SensorPort};
use crate::error::SensorError;

#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0x41A8_0000); // 21.0
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(0x4234_0000); // 45.0

/// Inject the next simulated reading.  Pass NaN to simulate a failed read.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f32, humidity_prc: f32) {
    SIM_TEMP_BITS.store(temperature_c.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY_BITS.store(humidity_prc.to_bits(), Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_prc: f32,
}

impl ClimateReading {
    const FAILED: Self = Self {
        temperature_c: f32::NAN,
        humidity_prc: f32::NAN,
    };
}

/// Decode a 5-byte DHT11 frame.
pub fn decode_frame(frame: &[u8; 5]) -> Result<ClimateReading, SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity_prc = f32::from(frame[0]) + f32::from(frame[1]) * 0.1;
    let mut temperature_c = f32::from(frame[2] & 0x7F) + f32::from(frame[3] & 0x0F) * 0.1;
    if frame[3] & 0x80 != 0 {
        temperature_c = -temperature_c;
    }

    Ok(ClimateReading {
        temperature_c,
        humidity_prc,
    })
}

pub struct Dht11Sensor {
    _gpio: i32,
}

impl Dht11Sensor {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// Read temperature and humidity; NaN pair on failure.
    pub fn read(&self) -> ClimateReading {
        match self.acquire() {
            Ok(reading) => reading,
            Err(e) => {
                debug!("dht11: read failed ({})", e);
                ClimateReading::FAILED
            }
        }
    }

    #[cfg(target_os = "espidf")]
    fn acquire(&self) -> Result<ClimateReading, SensorError> {
        use esp_idf_svc::sys::*;

        const START_LOW_US: u32 = 18_000;
        const BIT_ONE_THRESHOLD_US: u32 = 40;

        let pin = self._gpio;
        let mut frame = [0u8; 5];

        // SAFETY: the DHT pin is owned by this driver and only touched from
        // the sampling task; register accesses are plain GPIO calls.
        unsafe {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT);
            gpio_set_level(pin, 0);
            ets_delay_us(START_LOW_US);
            gpio_set_level(pin, 1);
            ets_delay_us(25);
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
        }

        // Sensor response: ~80 µs low, ~80 µs high.
        level_duration(pin, 0, 90)?;
        level_duration(pin, 1, 90)?;

        for bit in 0..40 {
            level_duration(pin, 0, 60)?;
            let high_us = level_duration(pin, 1, 80)?;
            if high_us > BIT_ONE_THRESHOLD_US {
                frame[bit / 8] |= 1 << (7 - (bit % 8));
            }
        }

        decode_frame(&frame)
    }

    #[cfg(not(target_os = "espidf"))]
    fn acquire(&self) -> Result<ClimateReading, SensorError> {
        let reading = ClimateReading {
            temperature_c: f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            humidity_prc: f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed)),
        };
        if reading.temperature_c.is_nan() || reading.humidity_prc.is_nan() {
            return Err(SensorError::Timeout);
        }
        Ok(reading)
    }
}

/// Microseconds the line stays at `level`, or `Timeout` past `max_us`.
#[cfg(target_os = "espidf")]
fn level_duration(pin: i32, level: i32, max_us: u32) -> Result<u32, SensorError> {
    use esp_idf_svc::sys::{ets_delay_us, gpio_get_level};

    let mut us = 0;
    // SAFETY: read-only level query on a configured input pin.
    while unsafe { gpio_get_level(pin) } == level {
        if us > max_us {
            return Err(SensorError::Timeout);
        }
        us += 1;
        unsafe { ets_delay_us(1) };
    }
    Ok(us)
}

impl SensorPort for Dht11Sensor {
    fn name(&self) -> &'static str {
        "dht11"
    }

    fn lifecycle(&self) -> SensorLifecycle {
        SensorLifecycle::Ready
    }

    fn sample(&mut self) -> Measurement {
        let r = self.read();
        Measurement::Climate {
            temperature_c: r.temperature_c,
            humidity_prc: r.humidity_prc,
        }
    }
}
