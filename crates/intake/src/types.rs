//! Shared value types for the Courier intake domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! payloads (file bytes, signed content) or participate in domain computations
//! (timestamps and their calendar arithmetic).

use chrono::{DateTime, Days, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::{DispatchRunId, FileName};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A raw input submitted for dispatch: a name plus opaque byte content.
///
/// Immutable once constructed. Two files are equal when both their names and
/// contents are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct File {
    name: FileName,
    content: Vec<u8>,
}

impl File {
    /// Creates a new [`File`].
    pub fn new(name: FileName, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            content: content.into(),
        }
    }

    /// Returns the file name.
    pub fn name(&self) -> &FileName {
        &self.name
    }

    /// Returns the raw file content.
    pub fn content(&self) -> &[u8] {
        &self.content
    }
}

// ---------------------------------------------------------------------------

/// Format token carried by a recognized [`Document`] (e.g. `"4.0"`, `"3.1"`).
///
/// The token is kept verbatim: no trimming or case folding is applied, and an
/// empty token is representable because recognizers may produce one. Whether a
/// token is acceptable is decided by the dispatch policy, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatVersion(String);

impl FormatVersion {
    /// Creates a [`FormatVersion`] from a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the token is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Structured representation of a [`File`] produced by a recognizer.
///
/// A document exists only for the duration of one dispatch attempt; it is
/// never stored or returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Name of the recognized document.
    pub name: FileName,

    /// Content to be signed and transmitted.
    pub content: Vec<u8>,

    /// When the document was created. Drives the freshness check.
    pub created: Timestamp,

    /// Format token declared by the document.
    pub format: FormatVersion,
}

impl Document {
    /// Creates a new [`Document`].
    pub fn new(
        name: FileName,
        content: impl Into<Vec<u8>>,
        created: Timestamp,
        format: FormatVersion,
    ) -> Self {
        Self {
            name,
            content: content.into(),
            created,
            format,
        }
    }
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Opaque signing credential supplied once per dispatch batch.
///
/// The core never inspects the bytes; they are handed to the cryptographer
/// unchanged. `Debug` output is redacted so credentials never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Vec<u8>);

impl Credential {
    /// Wraps raw credential material.
    pub fn new(material: impl Into<Vec<u8>>) -> Self {
        Self(material.into())
    }

    /// Returns the raw credential material.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"<redacted>").finish()
    }
}

// ---------------------------------------------------------------------------

/// Signed bytes produced by a cryptographer and passed unmodified to a sender.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignedPayload(Vec<u8>);

impl SignedPayload {
    /// Wraps signed bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Returns the signed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the payload and returns the signed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of one dispatch run.
///
/// `skipped_files` holds exactly the inputs that failed any pipeline stage,
/// in the same relative order as they were submitted. The cause of each skip
/// is deliberately not recorded here.
///
/// Only [`DispatchResult::new`] builds a result, so it is serialisable for
/// reporting but never deserialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    run_id: DispatchRunId,
    attempted: usize,
    skipped_files: Vec<File>,
}

impl DispatchResult {
    /// Creates a [`DispatchResult`].
    ///
    /// `skipped_files` must never hold more entries than `attempted`.
    pub fn new(run_id: DispatchRunId, attempted: usize, skipped_files: Vec<File>) -> Self {
        debug_assert!(skipped_files.len() <= attempted);
        Self {
            run_id,
            attempted,
            skipped_files,
        }
    }

    /// Identifier of the run that produced this result.
    pub fn run_id(&self) -> DispatchRunId {
        self.run_id
    }

    /// Number of files submitted to the run.
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Files that failed any stage, in input order.
    pub fn skipped_files(&self) -> &[File] {
        &self.skipped_files
    }

    /// Consumes the result and returns the skipped files.
    pub fn into_skipped_files(self) -> Vec<File> {
        self.skipped_files
    }

    /// Number of files that cleared every stage.
    pub fn delivered_count(&self) -> usize {
        self.attempted.saturating_sub(self.skipped_files.len())
    }

    /// Returns `true` if every submitted file was delivered.
    pub fn all_delivered(&self) -> bool {
        self.skipped_files.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Adds whole calendar months.
    ///
    /// The day of month is clamped to the last day of the target month, so
    /// January 31st plus one month is the last day of February. Returns `None`
    /// if the result is out of range.
    pub fn checked_add_months(self, months: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(months)).map(Self)
    }

    /// Subtracts whole days. Returns `None` if the result is out of range.
    pub fn checked_sub_days(self, days: u64) -> Option<Self> {
        self.0.checked_sub_days(Days::new(days)).map(Self)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
