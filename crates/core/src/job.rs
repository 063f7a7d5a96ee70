//! The job record and its store-facing shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::id::JobId;

/// A scheduled job as stored in the backing collection.
///
/// The payload (`data`) is opaque to the registry beyond field-path matching;
/// no operation mutates it after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Identifier assigned by the collection on creation; immutable.
    pub id: JobId,
    /// Free-form category string; never rewritten after creation.
    #[serde(rename = "type")]
    pub job_type: String,
    /// When the job becomes due.
    pub date: DateTime<Utc>,
    /// Arbitrary caller-defined payload.
    pub data: JsonValue,
    /// Monotonic: `false` at creation, set to `true` exactly once.
    pub complete: bool,
}

impl Job {
    /// A job is due when its date has been reached and it has not been
    /// completed. `now` is evaluated per query, not stored.
    pub fn is_due_at(&self, now: DateTime<Utc>) -> bool {
        !self.complete && self.date <= now
    }
}

/// Record handed to the collection's `create` on insertion; the collection
/// assigns the id and hands back the stored [`Job`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewJob {
    #[serde(rename = "type")]
    pub job_type: String,
    pub date: DateTime<Utc>,
    pub data: JsonValue,
    pub complete: bool,
}

/// Fields to set on an existing record. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub date: Option<DateTime<Utc>>,
    pub complete: Option<bool>,
}

impl JobUpdate {
    pub fn date(date: DateTime<Utc>) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }

    pub fn complete(complete: bool) -> Self {
        Self {
            complete: Some(complete),
            ..Self::default()
        }
    }
}
