use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::ids::{DEFAULT_ID_BITS, MAX_ID_BITS};

const DEFAULT_CHECK_INTERVAL_SECONDS: u64 = 60;

/// Runtime settings read from the environment (and `.env`, if present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub check_interval: Duration,
    pub id_bits: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            check_interval: Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECONDS),
            id_bits: DEFAULT_ID_BITS,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_vars(
            env::var("POLL_CHECK_INTERVAL_SECONDS").ok().as_deref(),
            env::var("POLL_ID_BITS").ok().as_deref(),
        )
    }

    fn from_vars(check_interval: Option<&str>, id_bits: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = check_interval {
            let seconds = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidCheckInterval)?;
            if seconds == 0 {
                return Err(ConfigError::InvalidCheckInterval);
            }
            config.check_interval = Duration::from_secs(seconds);
        }

        if let Some(raw) = id_bits {
            let bits = raw.trim().parse::<u32>().map_err(|_| ConfigError::InvalidIdBits)?;
            if !(1..=MAX_ID_BITS).contains(&bits) {
                return Err(ConfigError::InvalidIdBits);
            }
            config.id_bits = bits;
        }

        Ok(config)
    }
}
