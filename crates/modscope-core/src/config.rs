//! Service configuration

use crate::error::ConfigError;
use modscope_authz::{LookupDeadline, DEFAULT_MAX_CITY_LEN};
use modscope_types::RegionCatalog;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Moderation service configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Accepted state names
    pub regions: RegionCatalog,
    /// Longest accepted city name
    pub max_city_len: usize,
    /// Per-lookup deadline in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookup_timeout_ms: Option<u64>,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ModerationConfig {
    /// Parse TOML config; absent keys take their defaults
    ///
    /// # Errors
    /// `ConfigError::Toml` on malformed input
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load TOML config file
    ///
    /// # Errors
    /// IO or parse failures
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// With region catalog
    #[inline]
    #[must_use]
    pub fn with_regions(mut self, regions: RegionCatalog) -> Self {
        self.regions = regions;
        self
    }

    /// With maximum city length
    #[inline]
    #[must_use]
    pub fn with_max_city_len(mut self, max_city_len: usize) -> Self {
        self.max_city_len = max_city_len;
        self
    }

    /// With lookup timeout
    #[inline]
    #[must_use]
    pub fn with_lookup_timeout_ms(mut self, millis: u64) -> Self {
        self.lookup_timeout_ms = Some(millis);
        self
    }

    /// With log level
    #[inline]
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Deadline applied to collaborator reads
    #[inline]
    #[must_use]
    pub fn lookup_deadline(&self) -> LookupDeadline {
        LookupDeadline::from_millis(self.lookup_timeout_ms)
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            regions: RegionCatalog::default(),
            max_city_len: DEFAULT_MAX_CITY_LEN,
            lookup_timeout_ms: None,
            log_level: "info".to_string(),
        }
    }
}
