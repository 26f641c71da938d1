//! EnvNode Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  Dht11 / Mhz14a / Mq7   LogEventSink   NvsAdapter   Esp32Time  │
//! │  (SensorPort)           (EventSink)    (Config)     (TimePort) │
//! │  WifiAdapter            StatusServer (HTTP GET /)              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌──────────────────────┐        ┌──────────────────────┐      │
//! │  │ Sampler (main task)  │──────▶ │ SharedState          │      │
//! │  └──────────────────────┘        └──────────┬───────────┘      │
//! │                                  StatusService (httpd task)    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::prelude::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, EspWifi};

use envnode::adapters::http::StatusServer;
use envnode::adapters::log_sink::LogEventSink;
use envnode::adapters::nvs::NvsAdapter;
use envnode::adapters::time::Esp32TimeAdapter;
use envnode::adapters::wifi::{ConnectivityPort, WifiAdapter};
use envnode::app::events::AppEvent;
use envnode::app::ports::{ConfigPort, EventSink};
use envnode::app::sampler::Sampler;
use envnode::app::status::StatusService;
use envnode::calibration::calibrate;
use envnode::config::MonitorConfig;
use envnode::drivers::hw_init;
use envnode::pins;
use envnode::sensors::SensorBank;
use envnode::sensors::dht11::Dht11Sensor;
use envnode::sensors::mhz14a::{Mhz14aParams, Mhz14aSensor};
use envnode::sensors::mq7::{Mq7Params, Mq7Sensor};
use envnode::state::SharedState;

const WIFI_SSID: &str = match option_env!("WIFI_SSID") {
    Some(s) => s,
    None => "",
};
const WIFI_PASS: &str = match option_env!("WIFI_PASS") {
    Some(s) => s,
    None => "",
};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("EnvNode v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        return Err(envnode::error::Error::from(e).into());
    }
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_partition = EspDefaultNvsPartition::take()?;

    // ── 3. Config from NVS (or defaults) ──────────────────────
    let config = match NvsAdapter::new(nvs_partition.clone()).and_then(|nvs| nvs.load()) {
        Ok(cfg) => {
            info!("Config loaded from NVS");
            cfg
        }
        Err(e) => {
            warn!("NVS config unavailable ({}), using defaults", e);
            MonitorConfig::default()
        }
    };

    let mut log_sink = LogEventSink::new();

    // ── 4. Sensors + CO baseline ──────────────────────────────
    let dht = Dht11Sensor::new(pins::DHT_GPIO);
    let mhz = Mhz14aSensor::new(
        pins::MHZ_PWM_GPIO,
        Mhz14aParams::from_config(&config),
        Esp32TimeAdapter::new(),
    );
    let mut mq7 = Mq7Sensor::new(pins::MQ7_ADC_CHANNEL, Mq7Params::from_config(&config), FreeRtos);

    let baseline = calibrate(
        &mut mq7,
        config.calibration_sample_count,
        config.calibration_reference,
    )?;
    mq7.set_baseline(baseline);
    log_sink.emit(&AppEvent::Calibrated(baseline));

    let state = SharedState::new();
    let sensors: SensorBank = vec![Box::new(dht), Box::new(mhz), Box::new(mq7)];
    let sampler = Sampler::new(sensors, state.clone(), config.sensors_update_interval_ms);

    // ── 5. Network + status endpoint ──────────────────────────
    let wifi = BlockingWifi::wrap(
        EspWifi::new(peripherals.modem, sysloop.clone(), Some(nvs_partition))?,
        sysloop,
    )?;
    let mut wifi = WifiAdapter::new(wifi);

    let connected = wifi
        .set_credentials(WIFI_SSID, WIFI_PASS)
        .and_then(|()| wifi.connect());

    // Kept alive for the rest of main; dropping it stops httpd.
    let _server = match connected {
        Ok(()) => {
            let status = StatusService::new(state, config.thresholds.clone());
            match StatusServer::start(status, config.http_port) {
                Ok(server) => {
                    log_sink.emit(&AppEvent::StatusEndpointStarted {
                        port: config.http_port,
                    });
                    Some(server)
                }
                Err(e) => {
                    error!("HTTP server failed: {}", e);
                    None
                }
            }
        }
        Err(e) => {
            error!("WiFi unavailable: {}", e);
            log_sink.emit(&AppEvent::ConnectivityFailed);
            None
        }
    };

    // ── 6. Sampling loop (never returns) ──────────────────────
    sampler.run(FreeRtos, log_sink)
}
