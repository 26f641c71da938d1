//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`]: the [`MonitorConfig`] is stored as one
//! `postcard` blob under namespace `envnode`, key `moncfg`.
//!
//! - Validation: every field is range-checked before persistence and
//!   again after loading.
//! - Atomic writes: ESP-IDF NVS commits are atomic per blob.
//! - The simulation backend keeps blobs in memory (dev/test only).

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::config::MonitorConfig;

#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::nvs::{EspDefaultNvsPartition, EspNvs, NvsDefault};

const CONFIG_NAMESPACE: &str = "envnode";
const CONFIG_KEY: &str = "moncfg";

/// Upper bound for the serialized config blob.
const MAX_BLOB_SIZE: usize = 1024;

pub struct NvsAdapter {
    #[cfg(target_os = "espidf")]
    nvs: EspNvs<NvsDefault>,
    #[cfg(not(target_os = "espidf"))]
    store: HashMap<&'static str, Vec<u8>>,
}

impl NvsAdapter {
    /// Open the config namespace on the default NVS partition.
    ///
    /// The partition handle is shared with the WiFi driver, which keeps
    /// its calibration data there.
    #[cfg(target_os = "espidf")]
    pub fn new(partition: EspDefaultNvsPartition) -> Result<Self, ConfigError> {
        let nvs = EspNvs::new(partition, CONFIG_NAMESPACE, true).map_err(|e| {
            warn!("NvsAdapter: cannot open namespace '{}': {}", CONFIG_NAMESPACE, e);
            ConfigError::IoError
        })?;
        info!("NvsAdapter: ESP-IDF NVS namespace '{}' open", CONFIG_NAMESPACE);
        Ok(Self { nvs })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new() -> Result<Self, ConfigError> {
        info!("NvsAdapter: simulation backend");
        Ok(Self {
            store: HashMap::new(),
        })
    }

    /// Overwrite the stored blob without validation (simulation only).
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_write_raw(&mut self, bytes: &[u8]) {
        self.store.insert(CONFIG_KEY, bytes.to_vec());
    }

    #[cfg(target_os = "espidf")]
    fn read_blob(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        match self.nvs.get_blob(CONFIG_KEY, &mut buf) {
            Ok(blob) => Ok(blob.map(<[u8]>::to_vec)),
            Err(e) => {
                warn!("NvsAdapter: NVS read error {}", e);
                Err(ConfigError::IoError)
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_blob(&self) -> Result<Option<Vec<u8>>, ConfigError> {
        Ok(self.store.get(CONFIG_KEY).cloned())
    }

    #[cfg(target_os = "espidf")]
    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), ConfigError> {
        self.nvs.set_blob(CONFIG_KEY, bytes).map_err(|e| {
            warn!("NvsAdapter: NVS write error {}", e);
            ConfigError::IoError
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), ConfigError> {
        self.store.insert(CONFIG_KEY, bytes.to_vec());
        Ok(())
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<MonitorConfig, ConfigError> {
        let bytes = self.read_blob()?.ok_or(ConfigError::NotFound)?;
        let cfg: MonitorConfig =
            postcard::from_bytes(&bytes).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        info!("NvsAdapter: loaded config ({} bytes)", bytes.len());
        Ok(cfg)
    }

    fn save(&mut self, config: &MonitorConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        if bytes.len() > MAX_BLOB_SIZE {
            return Err(ConfigError::ValidationFailed("config blob too large"));
        }
        self.write_blob(&bytes)?;
        info!("NvsAdapter: config saved ({} bytes)", bytes.len());
        Ok(())
    }
}
