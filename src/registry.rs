//! Lock registry reader.
//!
//! Read-only inspection over the distributed mutex locks persisted in a
//! shared key-value store:
//! - [`get`] resolves a single lock entry by key.
//! - [`list`] enumerates every entry and filters the result by [`ListMode`].
//!
//! # Stored Values
//!
//! Each stored value is either a JSON document or an opaque string. The
//! acquisition component writes a `payload` object whose `type` field tags
//! the lock as `"Job"` or `"Batch"`. Decoding is total: a value that fails to
//! parse is carried as [`LockValue::Raw`] instead of being dropped or raised.
//!
//! # Watched Reads
//!
//! Inside [`list`] every read is bracketed by `watch`/`unwatch` so a caller
//! composing the listing into a store transaction can detect concurrent
//! modification. The bracket itself performs no retry and reacts to no
//! invalidation.

use crate::error::{LockviewError, Result};
use crate::store::LockStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Filter selecting which lock types a listing includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListMode {
    /// Only locks tagged `"Job"`.
    Job,
    /// Only locks tagged `"Batch"`.
    Batch,
    /// Job and batch locks; untyped entries are excluded.
    #[default]
    Default,
    /// Every live entry, decodable or not.
    All,
}

impl ListMode {
    /// Parse a mode name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "job" => Some(Self::Job),
            "batch" => Some(Self::Batch),
            "default" => Some(Self::Default),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Whether an entry with the given lock type belongs in this listing.
    fn includes(self, lock_type: Option<LockType>) -> bool {
        match self {
            ListMode::All => true,
            ListMode::Job => lock_type == Some(LockType::Job),
            ListMode::Batch => lock_type == Some(LockType::Batch),
            ListMode::Default => lock_type.is_some(),
        }
    }
}

/// Type of lock, read from a decoded value's `payload.type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LockType {
    /// Lock held for a single job.
    Job,
    /// Lock held for a batch of jobs.
    Batch,
}

impl LockType {
    /// Parse the payload tag. Comparison is case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Job" => Some(Self::Job),
            "Batch" => Some(Self::Batch),
            _ => None,
        }
    }

    /// Get the payload tag for this lock type.
    pub fn as_str(&self) -> &'static str {
        match self {
            LockType::Job => "Job",
            LockType::Batch => "Batch",
        }
    }
}

/// Decode result for a stored lock value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LockValue {
    /// The stored value parsed as a JSON document.
    Decoded(serde_json::Value),
    /// The original string, kept when parsing failed.
    Raw(String),
}

impl LockValue {
    /// Decode a raw stored value, falling back to the original string.
    pub fn decode(raw: String) -> Self {
        match serde_json::from_str(&raw) {
            Ok(doc) => Self::Decoded(doc),
            Err(_) => Self::Raw(raw),
        }
    }

    /// The lock type tagged in the decoded document, if any.
    ///
    /// Raw values, documents without a `payload.type` path, and unrecognized
    /// tags are all untyped.
    pub fn lock_type(&self) -> Option<LockType> {
        match self {
            Self::Decoded(doc) => doc
                .get("payload")
                .and_then(|payload| payload.get("type"))
                .and_then(|tag| tag.as_str())
                .and_then(LockType::from_tag),
            Self::Raw(_) => None,
        }
    }
}

/// A single lock entry observed in the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LockEntry {
    /// The store key identifying the lock.
    pub key: String,

    /// The stored value, decoded where possible.
    pub value: LockValue,
}

impl std::fmt::Display for LockEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value.lock_type() {
            Some(lock_type) => write!(f, "{} ({})", self.key, lock_type.as_str()),
            None => write!(f, "{} (untyped)", self.key),
        }
    }
}

/// Fetch a single lock entry by key.
///
/// Returns `Ok(None)` when the store holds no value for `key`. A value that
/// fails to decode is returned raw rather than treated as an error.
pub fn get<S: LockStore>(store: &S, key: &str) -> Result<Option<LockEntry>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    Ok(Some(LockEntry {
        key: key.to_string(),
        value: LockValue::decode(raw),
    }))
}

/// List every lock entry selected by `mode`.
///
/// Keys are enumerated once up front; each key is then read inside a
/// `watch`/`unwatch` bracket. A key deleted between enumeration and read is
/// skipped. Entries come back in the store's enumeration order.
///
/// # Errors
///
/// Only store failures surface. Per-key decode failures are handled by the
/// inclusion rules and never abort the listing.
pub fn list<S: LockStore>(store: &S, mode: ListMode) -> Result<Vec<LockEntry>> {
    let mut entries = Vec::new();

    for key in store.keys()? {
        store.watch(&key)?;
        let read = store.get(&key);
        // Unwatch before inspecting the read so the bracket stays paired
        // even when the read failed.
        store.unwatch()?;

        let Some(raw) = read? else {
            debug!(key = %key, "lock vanished between enumeration and read, skipping");
            continue;
        };

        let value = LockValue::decode(raw);
        if mode.includes(value.lock_type()) {
            entries.push(LockEntry { key, value });
        }
    }

    Ok(entries)
}

/// List lock entries by mode name.
///
/// Unknown names fail with [`LockviewError::InvalidMode`] before any store
/// access. See [`list`] for the listing semantics.
pub fn list_named<S: LockStore>(store: &S, mode: &str) -> Result<Vec<LockEntry>> {
    let mode = ListMode::from_str(mode)
        .ok_or_else(|| LockviewError::InvalidMode(mode.to_string()))?;

    list(store, mode)
}
