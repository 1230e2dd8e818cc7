//! In-memory document collection emulator.
//!
//! Provides a minimal document-database abstraction over process memory:
//! named collections of JSON documents with filter, sort, skip/limit, and
//! by-id mutation operations. Nothing here survives a process restart.

mod compare;
pub mod error;
pub mod query;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use query::{Filter, Matcher, Query, Sort, SortOrder};
pub use store::{Document, MemoryStore};
