//! `jobledger-store` — the backing-collection boundary.
//!
//! The registry is written against the [`JobCollection`] trait; any document
//! store that can create/read/update/delete records and evaluate the filter
//! model of `jobledger-core` can sit behind it. An in-memory implementation
//! is provided for tests and development.

pub mod collection;
pub mod memory;

pub use collection::{JobCollection, StoreError};
pub use memory::InMemoryCollection;
