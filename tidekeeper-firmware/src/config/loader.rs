//! Configuration persistence
//!
//! Loads the device configuration from flash storage.
//! Falls back to embedded defaults if flash is empty.

extern crate alloc;

use alloc::vec;
use core::str;
use defmt::*;

use tidekeeper_core::config::{
    parse_config, DeviceConfig, ParseError, ValidationError, CONFIG_VERSION,
};
use tidekeeper_hal_rp2040::flash::{FlashError, Rp2040FlashStorage, StorageKey};
use tidekeeper_hal_rp2040::FlashStorageTrait;

/// Maximum serialized config size (binary)
const MAX_CONFIG_SIZE: usize = 256;

/// Maximum TOML config size
const MAX_TOML_SIZE: usize = 2048;

/// Configuration persistence errors
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Flash operation failed
    Flash(FlashError),
    /// Deserialization failed
    Deserialize,
    /// TOML parsing failed
    TomlParse(ParseError),
    /// Invalid UTF-8 in TOML data
    InvalidUtf8,
    /// Config version mismatch
    VersionMismatch,
    /// Values out of range
    Invalid(ValidationError),
}

impl From<FlashError> for ConfigError {
    fn from(e: FlashError) -> Self {
        ConfigError::Flash(e)
    }
}

/// Configuration persistence manager
pub struct ConfigPersistence<'d> {
    storage: Rp2040FlashStorage<'d>,
}

impl<'d> ConfigPersistence<'d> {
    pub fn new(storage: Rp2040FlashStorage<'d>) -> Self {
        Self { storage }
    }

    /// Hand the storage back for calibration persistence
    pub fn into_storage(self) -> Rp2040FlashStorage<'d> {
        self.storage
    }

    /// Load configuration from flash
    ///
    /// Tries the TOML copy first, then the binary postcard copy.
    ///
    /// Both keys are read-only here: a provisioning tool writes them over
    /// SWD and the firmware never rewrites them.
    pub async fn load(&mut self) -> Result<DeviceConfig, ConfigError> {
        info!("Loading configuration from flash...");

        match self.load_toml().await {
            Ok(config) => {
                info!("Loaded configuration from TOML");
                return Ok(config);
            }
            Err(ConfigError::Flash(FlashError::NotFound)) => {
                debug!("No TOML config found, trying binary format");
            }
            Err(e) => {
                warn!("Failed to load TOML config: {:?}, trying binary", e);
            }
        }

        self.load_binary().await
    }

    async fn load_toml(&mut self) -> Result<DeviceConfig, ConfigError> {
        let mut buffer = vec![0u8; MAX_TOML_SIZE];
        let len = self
            .storage
            .read(StorageKey::DeviceConfigToml, &mut buffer)
            .await?;

        debug!("Read {} bytes of TOML from flash", len);

        let toml_str = str::from_utf8(&buffer[..len]).map_err(|_| ConfigError::InvalidUtf8)?;
        let config = parse_config(toml_str).map_err(ConfigError::TomlParse)?;

        check(config)
    }

    async fn load_binary(&mut self) -> Result<DeviceConfig, ConfigError> {
        let mut buffer = [0u8; MAX_CONFIG_SIZE];
        let len = self
            .storage
            .read(StorageKey::DeviceConfig, &mut buffer)
            .await?;

        debug!("Read {} bytes of binary config from flash", len);

        let config: DeviceConfig =
            postcard::from_bytes(&buffer[..len]).map_err(|_| ConfigError::Deserialize)?;

        check(config)
    }
}

/// Version and range checks shared by both formats
pub fn check(config: DeviceConfig) -> Result<DeviceConfig, ConfigError> {
    if config.version != CONFIG_VERSION {
        warn!(
            "Config version mismatch: found {}, expected {}",
            config.version, CONFIG_VERSION
        );
        return Err(ConfigError::VersionMismatch);
    }
    config.validate().map_err(ConfigError::Invalid)?;

    log_config_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded configuration
pub fn log_config_summary(config: &DeviceConfig) {
    debug!(
        "  pumps: drain gpio{} fill gpio{}",
        config.pumps.drain.pin, config.pumps.fill.pin
    );
    debug!(
        "  floats: bottom gpio{} top gpio{}",
        config.sensors.bottom.pin, config.sensors.top.pin
    );
    debug!(
        "  sequencer: poll {}ms, settle {}ms, timeouts {}s/{}s",
        config.sequencer.poll_interval_ms,
        config.sequencer.settle_ms,
        config.sequencer.drain_timeout_s,
        config.sequencer.fill_timeout_s
    );
    debug!(
        "  defaults: ATO {} AWC auto {} every {}h",
        config.defaults.ato_enabled, config.defaults.awc_automatic, config.defaults.total_hours
    );
}
