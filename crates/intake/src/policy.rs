//! Document validation policy.
//!
//! Pure business rules applied to a recognized [`Document`] before it is
//! signed: the format token must be one of the accepted tokens, and the
//! document must still be within its freshness window. No I/O happens here;
//! the current time is passed in by the caller.

use serde::{Deserialize, Serialize};

use crate::{DispatchConfig, Document, FormatVersion, Timestamp};

// ---------------------------------------------------------------------------
// Skip reasons
// ---------------------------------------------------------------------------

/// Why a file did not make it through dispatch.
///
/// Only used for structured logging; dispatch results intentionally report
/// skipped files without their cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The recognizer could not interpret the file.
    Unrecognized,
    /// The document declared a format token that is not accepted.
    UnsupportedFormat,
    /// The document is older than the freshness window.
    Stale,
    /// The cryptographer refused or failed to sign the content.
    SigningFailed,
    /// The sender reported that transmission failed.
    SendFailed,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unrecognized => "unrecognized",
            Self::UnsupportedFormat => "unsupported_format",
            Self::Stale => "stale",
            Self::SigningFailed => "signing_failed",
            Self::SendFailed => "send_failed",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Format and freshness rules derived from a [`DispatchConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPolicy {
    accepted_formats: Vec<FormatVersion>,
    freshness_months: u32,
}

impl DocumentPolicy {
    /// Builds the policy from a (validated) configuration.
    pub fn from_config(config: &DispatchConfig) -> Self {
        Self {
            accepted_formats: config.accepted_formats.clone(),
            freshness_months: config.freshness_months,
        }
    }

    /// Returns `true` if `format` exactly equals one of the accepted tokens.
    pub fn accepts_format(&self, format: &FormatVersion) -> bool {
        self.accepted_formats.iter().any(|accepted| accepted == format)
    }

    /// Returns `true` if `created` plus the freshness window is strictly later
    /// than `now`.
    ///
    /// A window end beyond the representable range counts as fresh.
    pub fn is_fresh(&self, created: Timestamp, now: Timestamp) -> bool {
        match created.checked_add_months(self.freshness_months) {
            Some(expires) => expires > now,
            None => true,
        }
    }

    /// Applies the format check, then the freshness check.
    pub fn evaluate(&self, document: &Document, now: Timestamp) -> Result<(), SkipReason> {
        if !self.accepts_format(&document.format) {
            return Err(SkipReason::UnsupportedFormat);
        }
        if !self.is_fresh(document.created, now) {
            return Err(SkipReason::Stale);
        }
        Ok(())
    }
}

impl Default for DocumentPolicy {
    fn default() -> Self {
        Self::from_config(&DispatchConfig::default())
    }
}
