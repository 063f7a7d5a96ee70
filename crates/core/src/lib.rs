//! `jobledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure
//! concerns): the job record, its identifier, and the filter model that
//! translates logical queries ("due jobs of type X", "jobs where
//! data.articleId = 2") into field-path constraints over the backing
//! collection.

pub mod filter;
pub mod id;
pub mod job;

pub use filter::{Condition, Filter};
pub use id::{JobId, ParseJobIdError};
pub use job::{Job, JobUpdate, NewJob};
