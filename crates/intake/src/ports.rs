//! Port traits for the external collaborators Courier depends on.
//!
//! Concrete recognizers, signers, transports, and backing stores live outside
//! this workspace. The orchestration crates see only these traits and hold
//! collaborators as shared `Arc<dyn ...>` handles whose lifetime belongs to
//! the caller.
//!
//! Ordinary failures are part of each contract (`None`, `false`, or a
//! [`CryptographerError`]); implementations must not panic for them.

use async_trait::async_trait;

use crate::{CacheKey, Credential, CryptographerError, Document, File, SignedPayload, Timestamp};

/// Interprets raw files as structured documents.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Returns the recognized document, or `None` if the file cannot be parsed.
    async fn recognize(&self, file: &File) -> Option<Document>;
}

/// Signs document content under a credential.
#[async_trait]
pub trait Cryptographer: Send + Sync {
    /// Produces the signed payload for `content`.
    async fn sign(
        &self,
        content: &[u8],
        credential: &Credential,
    ) -> Result<SignedPayload, CryptographerError>;
}

/// Transmits signed payloads.
#[async_trait]
pub trait Sender: Send + Sync {
    /// Returns `true` if the transmission was accepted.
    async fn try_send(&self, payload: &SignedPayload) -> bool;
}

/// Source of values for a memoizing lookup.
///
/// A `None` result covers both "not found" and "read failed"; callers cannot
/// and need not tell the two apart.
#[async_trait]
pub trait BackingStore<V>: Send + Sync {
    /// Reads the value stored under `key`.
    async fn try_read(&self, key: &CacheKey) -> Option<V>;
}

/// Source of the current time for freshness checks.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> Timestamp;
}

/// [`Clock`] backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// [`Clock`] that always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(Timestamp);

impl FixedClock {
    /// Creates a clock frozen at `at`.
    pub fn new(at: Timestamp) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
