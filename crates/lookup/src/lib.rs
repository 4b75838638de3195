//! Courier memoizing lookup.
//!
//! [`MemoizingLookup`] sits in front of an [`intake::BackingStore`] and
//! remembers every value the store successfully returns, so repeated lookups
//! of the same [`intake::CacheKey`] never reach the store twice. Misses are
//! not remembered.
//!
//! The cache is scoped to one `MemoizingLookup` instance and discarded with it.

mod memoizing;

pub use memoizing::MemoizingLookup;
