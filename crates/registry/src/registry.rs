//! The job registry: logical operations over a backing collection.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};

use jobledger_core::{Filter, Job, JobId, JobUpdate, NewJob};
use jobledger_store::JobCollection;

use crate::error::{RegistryError, RegistryResult};
use crate::logger::{Logger, TracingLogger};

const TYPE_REQUIRED: &str = "job type must be a non-empty string";

/// Bookkeeping for typed, dated, arbitrary-payload jobs.
///
/// Owns the mapping from logical operations to filter/record shapes sent to
/// the backing collection. Holds no mutable state beyond its collection and
/// logger references, so a single instance is safe to share across
/// concurrent callers. Every operation is a single collection call; there is
/// no cross-call atomicity, and races on the same id are the collection's
/// concern.
pub struct JobRegistry<C> {
    collection: C,
    logger: Arc<dyn Logger>,
}

impl<C: JobCollection> JobRegistry<C> {
    /// Create a registry logging through [`TracingLogger`].
    pub fn new(collection: C) -> Self {
        Self::with_logger(collection, Arc::new(TracingLogger))
    }

    /// Create a registry with an explicit logging sink.
    pub fn with_logger(collection: C, logger: Arc<dyn Logger>) -> Self {
        Self { collection, logger }
    }

    /// The backing collection, for embedding applications that need direct
    /// record access (e.g. by-id lookups).
    pub fn collection(&self) -> &C {
        &self.collection
    }

    /// Record a new job of `job_type`, becoming due at `date`, carrying
    /// `data`. Returns the identifier the collection assigned.
    ///
    /// Fails with a validation error, before any store access, when
    /// `job_type` is empty.
    pub fn schedule(
        &self,
        job_type: &str,
        date: DateTime<Utc>,
        data: JsonValue,
    ) -> RegistryResult<JobId> {
        if job_type.is_empty() {
            return Err(RegistryError::validation(TYPE_REQUIRED));
        }

        let job = self.collection.create(NewJob {
            job_type: job_type.to_string(),
            date,
            data,
            complete: false,
        })?;

        self.logger
            .info(&format!("job {} scheduled for {}", job.id, job.date));
        Ok(job.id)
    }

    /// Move the due date of the identified job to `date`.
    ///
    /// An unknown id surfaces as the collection's not-found error.
    pub fn reschedule(&self, id: JobId, date: DateTime<Utc>) -> RegistryResult<()> {
        let job = self.collection.update(id, JobUpdate::date(date))?;

        self.logger
            .info(&format!("job {} rescheduled for {}", job.id, job.date));
        Ok(())
    }

    /// Permanently remove the identified job.
    pub fn cancel(&self, id: JobId) -> RegistryResult<()> {
        self.collection.delete(id)?;

        self.logger.info(&format!("job {id} cancelled"));
        Ok(())
    }

    /// Mark the identified job complete. It will no longer be returned by
    /// the due queries; the flag is never reset.
    pub fn complete(&self, id: JobId) -> RegistryResult<()> {
        let job = self.collection.update(id, JobUpdate::complete(true))?;

        self.logger
            .info(&format!("job {} marked as complete", job.id));
        Ok(())
    }

    /// Uncompleted jobs whose date has been reached, across all types.
    /// No ordering guarantee.
    pub fn due(&self) -> RegistryResult<Vec<Job>> {
        self.due_matching(Filter::new())
    }

    /// Uncompleted jobs of `job_type` whose date has been reached.
    pub fn due_of_type(&self, job_type: &str) -> RegistryResult<Vec<Job>> {
        self.due_matching(Filter::new().job_type(job_type))
    }

    fn due_matching(&self, filter: Filter) -> RegistryResult<Vec<Job>> {
        // Due means date reached AND not yet completed; a completed job with
        // a past date must never appear here.
        let filter = filter.date_on_or_before(Utc::now()).complete(false);
        let jobs = self.collection.find(&filter)?;

        self.logger.info(&format!("{} due jobs found", jobs.len()));
        Ok(jobs)
    }

    /// Completed jobs, across all types. No ordering guarantee.
    pub fn completed(&self) -> RegistryResult<Vec<Job>> {
        self.completed_matching(Filter::new())
    }

    /// Completed jobs of `job_type`.
    pub fn completed_of_type(&self, job_type: &str) -> RegistryResult<Vec<Job>> {
        self.completed_matching(Filter::new().job_type(job_type))
    }

    fn completed_matching(&self, filter: Filter) -> RegistryResult<Vec<Job>> {
        let filter = filter.complete(true);
        let jobs = self.collection.find(&filter)?;

        self.logger
            .info(&format!("{} completed jobs found", jobs.len()));
        Ok(jobs)
    }

    /// Jobs whose payload fields all equal the given values. Each key `k`
    /// becomes a `data.k` constraint; keys combine with AND.
    pub fn find(&self, property_matches: &Map<String, JsonValue>) -> RegistryResult<Vec<Job>> {
        self.find_matching(Filter::new(), property_matches)
    }

    /// Like [`find`](Self::find), additionally restricted to `job_type`.
    pub fn find_of_type(
        &self,
        job_type: &str,
        property_matches: &Map<String, JsonValue>,
    ) -> RegistryResult<Vec<Job>> {
        self.find_matching(Filter::new().job_type(job_type), property_matches)
    }

    fn find_matching(
        &self,
        filter: Filter,
        property_matches: &Map<String, JsonValue>,
    ) -> RegistryResult<Vec<Job>> {
        let filter = property_matches
            .iter()
            .fold(filter, |f, (key, value)| f.data_eq(key, value.clone()));
        let jobs = self.collection.find(&filter)?;

        self.logger
            .info(&format!("{} jobs found for filter {filter}", jobs.len()));
        Ok(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use serde_json::json;

    use jobledger_store::{InMemoryCollection, StoreError};

    fn registry(collection: Arc<InMemoryCollection>) -> JobRegistry<Arc<InMemoryCollection>> {
        JobRegistry::with_logger(collection, Arc::new(crate::logger::NoopLogger))
    }

    #[test]
    fn schedule_rejects_an_empty_type_before_touching_the_store() {
        let collection = InMemoryCollection::arc();
        let registry = registry(collection.clone());

        let err = registry.schedule("", Utc::now(), json!({})).unwrap_err();

        assert_eq!(
            err,
            RegistryError::validation("job type must be a non-empty string")
        );
        assert!(collection.is_empty());
    }

    #[test]
    fn complete_is_never_reversed_by_later_operations() {
        let collection = InMemoryCollection::arc();
        let registry = registry(collection.clone());

        let id = registry.schedule("repair", Utc::now(), json!({})).unwrap();
        registry.complete(id).unwrap();
        registry.reschedule(id, Utc::now()).unwrap();

        assert!(collection.read(id).unwrap().unwrap().complete);
    }

    /// Collection double that records the filter each `find` received.
    #[derive(Default)]
    struct CapturingCollection {
        last_filter: Mutex<Option<Filter>>,
    }

    impl JobCollection for CapturingCollection {
        fn create(&self, _record: NewJob) -> Result<Job, StoreError> {
            unimplemented!("not exercised")
        }

        fn read(&self, _id: JobId) -> Result<Option<Job>, StoreError> {
            unimplemented!("not exercised")
        }

        fn update(&self, _id: JobId, _update: JobUpdate) -> Result<Job, StoreError> {
            unimplemented!("not exercised")
        }

        fn delete(&self, _id: JobId) -> Result<(), StoreError> {
            unimplemented!("not exercised")
        }

        fn find(&self, filter: &Filter) -> Result<Vec<Job>, StoreError> {
            *self.last_filter.lock().unwrap() = Some(filter.clone());
            Ok(Vec::new())
        }
    }

    #[test]
    fn find_of_type_constructs_the_dotted_path_filter() {
        let collection = Arc::new(CapturingCollection::default());
        let registry =
            JobRegistry::with_logger(collection.clone(), Arc::new(crate::logger::NoopLogger));

        let mut matches = Map::new();
        matches.insert("a".to_string(), json!(10));
        matches.insert("b".to_string(), json!("abc"));
        registry.find_of_type("repair", &matches).unwrap();

        let filter = collection.last_filter.lock().unwrap().clone().unwrap();
        assert_eq!(
            filter.to_json(),
            json!({ "type": "repair", "data.a": 10, "data.b": "abc" })
        );
    }

    #[test]
    fn due_queries_exclude_completed_jobs_in_the_filter_itself() {
        let collection = Arc::new(CapturingCollection::default());
        let registry =
            JobRegistry::with_logger(collection.clone(), Arc::new(crate::logger::NoopLogger));

        registry.due_of_type("repair").unwrap();

        let filter = collection.last_filter.lock().unwrap().clone().unwrap();
        let rendered = filter.to_json();
        assert_eq!(rendered["type"], "repair");
        assert_eq!(rendered["complete"], false);
        assert!(rendered["date"]["onOrBefore"].is_string());
    }
}
