//! MH-Z14A NDIR CO2 sensor driver (PWM output).
//!
//! The PWM cycle is 1004 ms: a 2 ms high start, the variable high part,
//! then a 2 ms low end.  Concentration is
//!
//! ```text
//!   ppm = range × (Th − 2) / (Th + Tl − 4)       Tl = 1004 − Th
//! ```
//!
//! The sensor needs a three-minute preheat after power-on.  Reads are not
//! suppressed while preheating; the flags are reported next to the value
//! and the consumer decides.

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

use log::debug;

use crate::app::ports::{Measurement, SensorLifecycle, SensorPort, TimePort};
use crate::config::MonitorConfig;
use crate::state::Co2Status;

/// Full PWM cycle length (ms).
pub const PWM_CYCLE_MS: i32 = 1004;

/// Host only: high time read once the queued pulses run out.
#[cfg(not(target_os = "espidf"))]
const SIM_DEFAULT_HIGH_MS: i32 = 122; // ≈ 600 ppm at 5000 range

/// Convert a measured high time to a concentration.
pub fn ppm_from_high_ms(range_ppm: u16, high_ms: i32) -> i32 {
    let low_ms = PWM_CYCLE_MS - high_ms;
    i32::from(range_ppm) * (high_ms - 2) / (high_ms + low_ms - 4)
}

#[derive(Debug, Clone, Copy)]
pub struct Mhz14aParams {
    pub range_ppm: u16,
    pub preheat_ms: u32,
    pub max_attempts: u8,
}

impl Mhz14aParams {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            range_ppm: config.co2_range_ppm,
            preheat_ms: config.co2_preheat_ms,
            max_attempts: config.co2_pwm_max_attempts,
        }
    }
}

pub struct Mhz14aSensor<T: TimePort> {
    params: Mhz14aParams,
    clock: T,
    _pwm_gpio: i32,
    /// Host only: pulses served before falling back to `SIM_DEFAULT_HIGH_MS`.
    #[cfg(not(target_os = "espidf"))]
    sim_pulses: VecDeque<i32>,
    #[cfg(not(target_os = "espidf"))]
    sim_pulse_reads: u32,
}

impl<T: TimePort> Mhz14aSensor<T> {
    pub fn new(pwm_gpio: i32, params: Mhz14aParams, clock: T) -> Self {
        Self {
            params,
            clock,
            _pwm_gpio: pwm_gpio,
            #[cfg(not(target_os = "espidf"))]
            sim_pulses: VecDeque::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_pulse_reads: 0,
        }
    }

    /// Queue high times for the next pulse reads of this instance.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_queue_pulses(&mut self, high_ms: impl IntoIterator<Item = i32>) {
        self.sim_pulses.extend(high_ms);
    }

    /// Pulse reads performed so far.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_pulse_reads(&self) -> u32 {
        self.sim_pulse_reads
    }

    /// True until the preheat window since boot has elapsed.
    pub fn is_pre_heating(&self) -> bool {
        self.clock.uptime_ms() < u64::from(self.params.preheat_ms)
    }

    pub fn is_ready(&self) -> bool {
        !self.is_pre_heating()
    }

    /// Best-effort concentration.  A pulse that reads as zero is retried
    /// up to `max_attempts` times; the last value is returned regardless.
    pub fn read_co2_pwm(&mut self) -> i32 {
        let mut high_ms = 0;
        for attempt in 1..=self.params.max_attempts {
            high_ms = self.pulse_high_ms();
            if high_ms != 0 {
                break;
            }
            debug!("mhz14a: no PWM pulse (attempt {})", attempt);
        }
        ppm_from_high_ms(self.params.range_ppm, high_ms)
    }

    /// Width of the next high pulse in whole milliseconds, 0 on timeout.
    #[cfg(target_os = "espidf")]
    fn pulse_high_ms(&mut self) -> i32 {
        use esp_idf_svc::sys::{esp_timer_get_time, gpio_get_level};

        const TIMEOUT_US: i64 = 1_004_000;
        let pin = self._pwm_gpio;
        // SAFETY: read-only timer and level queries on a configured input.
        let level = || unsafe { gpio_get_level(pin) };
        let now = || unsafe { esp_timer_get_time() };

        let start = now();
        // Skip a pulse already in progress, then wait for the rising edge.
        while level() == 1 {
            if now() - start > TIMEOUT_US {
                return 0;
            }
        }
        while level() == 0 {
            if now() - start > TIMEOUT_US {
                return 0;
            }
        }
        let rise = now();
        while level() == 1 {
            if now() - start > TIMEOUT_US {
                return 0;
            }
        }
        ((now() - rise) / 1000) as i32
    }

    #[cfg(not(target_os = "espidf"))]
    fn pulse_high_ms(&mut self) -> i32 {
        self.sim_pulse_reads += 1;
        self.sim_pulses
            .pop_front()
            .unwrap_or(SIM_DEFAULT_HIGH_MS)
    }

    fn status(&self) -> Co2Status {
        Co2Status {
            is_ready: self.is_ready(),
            is_pre_heating: self.is_pre_heating(),
        }
    }
}

impl<T: TimePort> SensorPort for Mhz14aSensor<T> {
    fn name(&self) -> &'static str {
        "mhz14a"
    }

    fn lifecycle(&self) -> SensorLifecycle {
        self.status().lifecycle()
    }

    fn sample(&mut self) -> Measurement {
        let status = self.status();
        let ppm = self.read_co2_pwm();
        Measurement::Co2 { ppm, status }
    }
}
