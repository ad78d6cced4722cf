//! Configuration module
//!
//! `AppConfig` is read from a TOML file. Every section and field has a
//! default, so a missing file or a partial file is fine:
//!
//! ```toml
//! [database]
//! url = "sqlite://./court-booking.db?mode=rwc"
//!
//! [booking]
//! horizon_days = 30
//!
//! [pricing]
//! default_daytime_rate = 15000
//! default_nighttime_rate = 20000
//!
//! [payments]
//! pending_ttl_hours = 24
//! ```

use std::path::{Path, PathBuf};

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::domain::calendar::{BookingPolicy, Clock};
use crate::domain::money::Money;
use crate::domain::pricing::PricingEngine;
use crate::infrastructure::database::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub database: DatabaseConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
    #[validate(nested)]
    pub booking: BookingConfig,
    #[validate(nested)]
    pub pricing: PricingConfig,
    #[validate(nested)]
    pub payments: PaymentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set
    #[validate(length(min = 1))]
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct BookingConfig {
    /// Last bookable date is `today + horizon_days`
    #[validate(range(min = 1, max = 366))]
    pub horizon_days: u32,
    /// Offset of the venue's local time from UTC, used to decide "today"
    #[validate(range(min = -720, max = 840))]
    pub utc_offset_minutes: i32,
    /// Default length of a recurring request
    #[validate(range(min = 1, max = 52))]
    pub recurring_weeks: u32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            utc_offset_minutes: 0,
            recurring_weeks: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PricingConfig {
    #[validate(range(max = 23))]
    pub day_start_hour: u32,
    #[validate(range(max = 23))]
    pub default_cutoff_hour: u32,
    /// Hourly rates in the smallest currency unit
    #[validate(range(min = 0))]
    pub default_daytime_rate: i64,
    #[validate(range(min = 0))]
    pub default_nighttime_rate: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            day_start_hour: 6,
            default_cutoff_hour: 18,
            default_daytime_rate: 0,
            default_nighttime_rate: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PaymentsConfig {
    /// Reject proof-less pending payments older than this. Unset disables
    /// expiry.
    #[validate(range(min = 1))]
    pub pending_ttl_hours: Option<u32>,
    #[validate(range(min = 1))]
    pub expiry_check_interval_secs: u64,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            pending_ttl_hours: None,
            expiry_check_interval_secs: 60,
        }
    }
}

impl AppConfig {
    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&raw).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn pricing_engine(&self) -> PricingEngine {
        PricingEngine::new(
            self.pricing.day_start_hour,
            self.pricing.default_cutoff_hour,
            Money::from_minor(self.pricing.default_daytime_rate),
            Money::from_minor(self.pricing.default_nighttime_rate),
        )
    }

    /// Booking policy on the wall clock of the configured UTC offset.
    pub fn booking_policy(&self) -> BookingPolicy {
        let utc_offset = FixedOffset::east_opt(self.booking.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix());
        BookingPolicy::new(Clock::System { utc_offset }, self.booking.horizon_days)
    }

    pub fn pending_ttl(&self) -> Option<chrono::Duration> {
        self.payments
            .pending_ttl_hours
            .map(|h| chrono::Duration::hours(i64::from(h)))
    }
}

/// `~/.config/court-booking/config.toml`, or `./config.toml` when no config
/// directory is known.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("court-booking").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}
