//! Collection contract for job records.

use std::sync::Arc;

use thiserror::Error;

use jobledger_core::{Filter, Job, JobId, JobUpdate, NewJob};

/// Collection operation error.
///
/// These are **infrastructure errors** (missing records, storage failures) as
/// opposed to domain errors (validation). The registry propagates them to the
/// caller unchanged: no retry, no translation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("storage error: {0}")]
    Storage(String),
}

/// A persistent collection of job records.
///
/// Implementations must:
/// - assign each record an id exactly once, at creation
/// - fail `update` and `delete` with [`StoreError::NotFound`] when no record
///   carries the given id
/// - evaluate filters per the semantics of [`jobledger_core::Filter`],
///   including the `onOrBefore` date comparison and dotted `data.` paths
/// - make no ordering guarantee on `find` results
///
/// Concurrency control for racing updates on the same id is the
/// implementation's concern; callers impose no locking of their own.
pub trait JobCollection: Send + Sync {
    /// Insert a record, assigning its id. Returns the stored record.
    fn create(&self, record: NewJob) -> Result<Job, StoreError>;

    /// Fetch a record by id. `Ok(None)` when absent.
    fn read(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    /// Apply the set fields of `update` to the identified record and return
    /// the updated record.
    fn update(&self, id: JobId, update: JobUpdate) -> Result<Job, StoreError>;

    /// Remove a record by id.
    fn delete(&self, id: JobId) -> Result<(), StoreError>;

    /// All records satisfying every condition of `filter`.
    fn find(&self, filter: &Filter) -> Result<Vec<Job>, StoreError>;
}

impl<C> JobCollection for Arc<C>
where
    C: JobCollection + ?Sized,
{
    fn create(&self, record: NewJob) -> Result<Job, StoreError> {
        (**self).create(record)
    }

    fn read(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        (**self).read(id)
    }

    fn update(&self, id: JobId, update: JobUpdate) -> Result<Job, StoreError> {
        (**self).update(id, update)
    }

    fn delete(&self, id: JobId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Job>, StoreError> {
        (**self).find(filter)
    }
}
