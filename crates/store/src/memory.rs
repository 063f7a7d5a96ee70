//! In-memory job collection.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use jobledger_core::{Filter, Job, JobId, JobUpdate, NewJob};

use crate::collection::{JobCollection, StoreError};

/// In-memory collection for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryCollection {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of records currently held.
    pub fn len(&self) -> usize {
        self.jobs.read().map(|jobs| jobs.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl JobCollection for InMemoryCollection {
    fn create(&self, record: NewJob) -> Result<Job, StoreError> {
        let mut jobs = self
            .jobs
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let job = Job {
            id: JobId::new(),
            job_type: record.job_type,
            date: record.date,
            data: record.data,
            complete: record.complete,
        };
        jobs.insert(job.id, job.clone());
        Ok(job)
    }

    fn read(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        let jobs = self
            .jobs
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        Ok(jobs.get(&id).cloned())
    }

    fn update(&self, id: JobId, update: JobUpdate) -> Result<Job, StoreError> {
        let mut jobs = self
            .jobs
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let job = jobs.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        if let Some(date) = update.date {
            job.date = date;
        }
        if let Some(complete) = update.complete {
            job.complete = complete;
        }
        Ok(job.clone())
    }

    fn delete(&self, id: JobId) -> Result<(), StoreError> {
        let mut jobs = self
            .jobs
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        jobs.remove(&id).ok_or(StoreError::NotFound(id))?;
        Ok(())
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Job>, StoreError> {
        let jobs = self
            .jobs
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        Ok(jobs.values().filter(|j| filter.matches(j)).cloned().collect())
    }
}
