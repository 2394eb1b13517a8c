//! Lockview: read-only inspection over distributed mutual-exclusion locks.
//!
//! The locks themselves are acquired and released by an external component;
//! lockview only observes the key-value store where they persist. Two
//! operations make up the surface: [`registry::get`] fetches one lock entry
//! by key, and [`registry::list`] produces a filtered listing of all of
//! them.
//!
//! The store handle is injected through the [`store::LockStore`] trait;
//! [`store::MemoryStore`] backs tests and in-process embedding.

pub mod error;
pub mod registry;
pub mod store;

pub use error::{LockviewError, Result};
pub use registry::{get, list, list_named, ListMode, LockEntry, LockType, LockValue};
pub use store::{LockStore, MemoryStore, WatchEvent};
