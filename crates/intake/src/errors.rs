//! Error types for the Courier intake domain.
//!
//! Expected dispatch outcomes (unrecognized input, unsupported format, stale
//! document, failed transmission) are **not** errors: they surface as skipped
//! files. The types here cover malformed identifiers, collaborator failures
//! that a port is allowed to report, and configuration that cannot be used.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Identifier errors
// ---------------------------------------------------------------------------

/// A value could not be turned into a non-empty identifier.
///
/// Produced when deserialising identifiers such as [`crate::FileName`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The value was the empty string.
    #[error("{kind} must not be empty")]
    Empty {
        /// Name of the identifier type that rejected the value.
        kind: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Collaborator errors
// ---------------------------------------------------------------------------

/// Failure reported by a [`crate::Cryptographer`] implementation.
///
/// The dispatcher treats any variant as a skip for the affected file; the
/// distinction exists so implementations can log meaningfully.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptographerError {
    /// The content or credential was rejected (e.g. expired credential).
    #[error("Signing rejected: {reason}")]
    Rejected {
        /// Human-readable description of why signing was refused.
        reason: String,
    },

    /// The signing backend could not be reached or is not ready.
    #[error("Signing backend unavailable: {reason}")]
    Unavailable {
        /// Human-readable description of the outage.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors produced while loading or validating a [`crate::DispatchConfig`].
///
/// Produced at load time; a dispatcher is never constructed from an invalid
/// configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("Configuration could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    /// No accepted format tokens were configured, so every file would be skipped.
    #[error("Configuration error: accepted_formats must not be empty")]
    EmptyFormats,

    /// An accepted format token was the empty string.
    #[error("Configuration error: accepted_formats[{index}] is empty")]
    InvalidFormatToken {
        /// Position of the offending token in `accepted_formats`.
        index: usize,
    },

    /// The freshness window was zero months, so every document would be stale.
    #[error("Configuration error: freshness_months must be at least 1")]
    ZeroFreshnessWindow,

    /// Concurrency was zero, so no file could ever be processed.
    #[error("Configuration error: max_concurrency must be at least 1")]
    ZeroConcurrency,
}
