//! Engine configuration.

use std::time::Duration;

use crate::core::id::InstanceId;

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Variable present but unparsable.
    #[error("Invalid value for {var}: {value}")]
    InvalidValue {
        /// Environment variable.
        var: &'static str,
        /// Raw value.
        value: String,
    },

    /// A duration was shorter than one second.
    #[error("{0} must be at least one second")]
    ZeroDuration(&'static str),
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Binds every commitment to this deployment.
    pub instance_id: InstanceId,
    /// Phase duration of symmetric matches.
    pub symmetric_timeout: Duration,
    /// One timeout unit of sealed matches.
    pub timeout_unit: Duration,
    /// Phase duration of open-market matches.
    pub open_market_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            instance_id: InstanceId::random(),
            symmetric_timeout: Duration::from_secs(3600),
            timeout_unit: Duration::from_secs(3600),
            open_market_timeout: Duration::from_secs(3600),
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let instance_id = match std::env::var("ESCROW_INSTANCE_ID") {
            Ok(value) => InstanceId::from_uuid_str(&value).ok_or(ConfigError::InvalidValue {
                var: "ESCROW_INSTANCE_ID",
                value,
            })?,
            Err(_) => defaults.instance_id,
        };

        let config = Self {
            instance_id,
            symmetric_timeout: secs_var(
                "ESCROW_SYMMETRIC_TIMEOUT_SECS",
                defaults.symmetric_timeout,
            )?,
            timeout_unit: secs_var("ESCROW_TIMEOUT_UNIT_SECS", defaults.timeout_unit)?,
            open_market_timeout: secs_var(
                "ESCROW_OPEN_MARKET_TIMEOUT_SECS",
                defaults.open_market_timeout,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject durations that truncate to zero whole seconds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let durations = [
            ("symmetric_timeout", self.symmetric_timeout),
            ("timeout_unit", self.timeout_unit),
            ("open_market_timeout", self.open_market_timeout),
        ];
        for (name, duration) in durations {
            if duration.as_secs() == 0 {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(())
    }
}

fn secs_var(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(default),
    }
}
