//! Intake domain for Courier.
//!
//! This crate contains every domain concept, newtype identifier, value type,
//! error type, and port trait used by the dispatch and lookup crates.
//! Collaborators outside the workspace implement the traits defined here;
//! they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; collaborators define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`FileName`, `CacheKey`, `DispatchRunId`) |
//! | [`types`] | Value types (`File`, `Document`, `Credential`, `Timestamp`, etc.) |
//! | [`errors`] | Identifier, collaborator, and configuration error types |
//! | [`config`] | `DispatchConfig` and its defaults |
//! | [`policy`] | Format and freshness rules, `SkipReason` |
//! | [`ports`] | `Recognizer`, `Cryptographer`, `Sender`, `BackingStore`, `Clock` |

pub mod config;
pub mod errors;
pub mod identifiers;
pub mod policy;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use config::DispatchConfig;
pub use errors::{ConfigError, CryptographerError, IdentifierError};
pub use identifiers::{CacheKey, DispatchRunId, FileName};
pub use policy::{DocumentPolicy, SkipReason};
pub use ports::{BackingStore, Clock, Cryptographer, FixedClock, Recognizer, Sender, SystemClock};
pub use types::{
    Credential, DispatchResult, Document, File, FormatVersion, SignedPayload, Timestamp,
};
