//! Dispatch configuration.
//!
//! [`DispatchConfig`] is deserialised from JSON (every field optional) and
//! validated before a dispatcher may use it. The defaults reproduce the
//! standard policy: formats `"4.0"` and `"3.1"`, a one-month freshness window.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, FormatVersion};

/// Format tokens accepted when none are configured.
pub const DEFAULT_ACCEPTED_FORMATS: [&str; 2] = ["4.0", "3.1"];

/// Freshness window, in calendar months, when none is configured.
pub const DEFAULT_FRESHNESS_MONTHS: u32 = 1;

/// Number of files processed concurrently when none is configured.
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Tunables for a dispatch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    /// Format tokens a document must match exactly (case-sensitive, no trimming).
    pub accepted_formats: Vec<FormatVersion>,

    /// A document is fresh while `created + freshness_months` is strictly later
    /// than the current time.
    pub freshness_months: u32,

    /// Upper bound on files processed at the same time.
    pub max_concurrency: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            accepted_formats: DEFAULT_ACCEPTED_FORMATS
                .iter()
                .map(|token| FormatVersion::new(*token))
                .collect(),
            freshness_months: DEFAULT_FRESHNESS_MONTHS,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl DispatchConfig {
    /// Parses a JSON configuration document and validates it.
    ///
    /// Missing fields take their defaults; unknown fields are rejected.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration can actually deliver documents.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.accepted_formats.is_empty() {
            return Err(ConfigError::EmptyFormats);
        }
        if let Some(index) = self.accepted_formats.iter().position(FormatVersion::is_empty) {
            return Err(ConfigError::InvalidFormatToken { index });
        }
        if self.freshness_months == 0 {
            return Err(ConfigError::ZeroFreshnessWindow);
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }
}
