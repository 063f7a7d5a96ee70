//! Query filters over stored jobs.
//!
//! A filter maps field paths to conditions. Paths are either top-level record
//! fields (`type`, `complete`, `date`) or dotted paths into the job payload
//! (`data.<field>`). Conditions on distinct paths combine with logical AND.
//!
//! ## Payload matching semantics
//!
//! A `data.` path is resolved by splitting on `.` and descending segment-wise
//! through JSON objects. The value found at the addressed node must equal the
//! constraint literal exactly; when the addressed node is itself an object,
//! that means exact sub-object equality, not partial matching.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::job::Job;

/// Field path for the job category.
pub const TYPE_FIELD: &str = "type";
/// Field path for the due date.
pub const DATE_FIELD: &str = "date";
/// Field path for the completion flag.
pub const COMPLETE_FIELD: &str = "complete";

const DATA_PREFIX: &str = "data.";

/// A single constraint on a field path.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// The addressed value must equal this literal exactly.
    Equals(JsonValue),
    /// The addressed date must be at or before this instant.
    OnOrBefore(DateTime<Utc>),
}

impl Condition {
    /// JSON rendering used for logs and assertions. Equality renders as the
    /// bare literal; the date comparison renders as a `{"onOrBefore": ..}`
    /// wrapper object.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Condition::Equals(value) => value.clone(),
            Condition::OnOrBefore(instant) => {
                let mut wrapper = Map::new();
                wrapper.insert(
                    "onOrBefore".to_string(),
                    JsonValue::String(instant.to_rfc3339()),
                );
                JsonValue::Object(wrapper)
            }
        }
    }
}

/// An AND-combined set of field constraints.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Filter {
    conditions: BTreeMap<String, Condition>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to jobs of the given type.
    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.conditions.insert(
            TYPE_FIELD.to_string(),
            Condition::Equals(JsonValue::String(job_type.into())),
        );
        self
    }

    /// Restrict on the completion flag.
    pub fn complete(mut self, complete: bool) -> Self {
        self.conditions
            .insert(COMPLETE_FIELD.to_string(), Condition::Equals(JsonValue::Bool(complete)));
        self
    }

    /// Restrict to jobs whose date has been reached by `instant`.
    pub fn date_on_or_before(mut self, instant: DateTime<Utc>) -> Self {
        self.conditions
            .insert(DATE_FIELD.to_string(), Condition::OnOrBefore(instant));
        self
    }

    /// Restrict on a payload field, addressed as `data.<field>`.
    pub fn data_eq(mut self, field: &str, value: impl Into<JsonValue>) -> Self {
        self.conditions.insert(
            format!("{DATA_PREFIX}{field}"),
            Condition::Equals(value.into()),
        );
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Iterate the (path, condition) pairs in path order.
    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(path, c)| (path.as_str(), c))
    }

    /// Whether `job` satisfies every condition in this filter.
    ///
    /// Unknown top-level paths never match; a `data.` path that does not
    /// resolve inside the payload never matches.
    pub fn matches(&self, job: &Job) -> bool {
        self.conditions.iter().all(|(path, condition)| match (path.as_str(), condition) {
            (TYPE_FIELD, Condition::Equals(v)) => v.as_str() == Some(job.job_type.as_str()),
            (COMPLETE_FIELD, Condition::Equals(v)) => v.as_bool() == Some(job.complete),
            (DATE_FIELD, Condition::OnOrBefore(instant)) => job.date <= *instant,
            (path, Condition::Equals(v)) => match path.strip_prefix(DATA_PREFIX) {
                Some(data_path) => lookup_path(&job.data, data_path) == Some(v),
                None => false,
            },
            _ => false,
        })
    }

    /// Render the whole filter as a JSON object, for logs and assertions.
    pub fn to_json(&self) -> JsonValue {
        let mut object = Map::new();
        for (path, condition) in &self.conditions {
            object.insert(path.clone(), condition.to_json());
        }
        JsonValue::Object(object)
    }
}

impl core::fmt::Display for Filter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

/// Resolve a dotted path against a JSON value, descending through objects
/// segment by segment.
fn lookup_path<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path.split('.')
        .try_fold(value, |node, segment| node.as_object()?.get(segment))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::JobId;
    use serde_json::json;

    fn job(job_type: &str, data: JsonValue) -> Job {
        Job {
            id: JobId::new(),
            job_type: job_type.to_string(),
            date: Utc::now(),
            data,
            complete: false,
        }
    }

    #[test]
    fn data_fields_become_dotted_paths() {
        let filter = Filter::new()
            .job_type("repair")
            .data_eq("a", 10)
            .data_eq("b", "abc");

        assert_eq!(
            filter.to_json(),
            json!({ "type": "repair", "data.a": 10, "data.b": "abc" })
        );
    }

    #[test]
    fn conditions_combine_with_and() {
        let filter = Filter::new().data_eq("a", 10).data_eq("b", "abc");

        assert!(filter.matches(&job("repair", json!({ "a": 10, "b": "abc" }))));
        assert!(!filter.matches(&job("repair", json!({ "a": 10, "b": "xyz" }))));
        assert!(!filter.matches(&job("repair", json!({ "a": 10 }))));
    }

    #[test]
    fn type_condition_matches_the_category() {
        let filter = Filter::new().job_type("repair");

        assert!(filter.matches(&job("repair", json!({}))));
        assert!(!filter.matches(&job("clearCache", json!({}))));
    }

    #[test]
    fn date_condition_is_inclusive() {
        let now = Utc::now();
        let filter = Filter::new().date_on_or_before(now);

        let mut due = job("repair", json!({}));
        due.date = now;
        assert!(filter.matches(&due));

        let mut future = job("repair", json!({}));
        future.date = now + chrono::TimeDelta::seconds(1);
        assert!(!filter.matches(&future));
    }

    #[test]
    fn dotted_paths_descend_into_nested_objects() {
        let filter = Filter::new().data_eq("article.id", 2);

        assert!(filter.matches(&job("repair", json!({ "article": { "id": 2 } }))));
        assert!(!filter.matches(&job("repair", json!({ "article": { "id": 3 } }))));
        assert!(!filter.matches(&job("repair", json!({ "article": 2 }))));
    }

    #[test]
    fn nested_object_values_require_exact_equality() {
        let filter = Filter::new().data_eq("article", json!({ "id": 2 }));

        assert!(filter.matches(&job("repair", json!({ "article": { "id": 2 } }))));
        // Partial matching is not supported: extra keys fail the comparison.
        assert!(!filter.matches(&job("repair", json!({ "article": { "id": 2, "rev": 7 } }))));
    }

    #[test]
    fn display_renders_the_comparison_wrapper() {
        let instant = "2020-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let filter = Filter::new().date_on_or_before(instant).complete(false);

        assert_eq!(
            filter.to_json(),
            json!({ "complete": false, "date": { "onOrBefore": "2020-01-01T00:00:00+00:00" } })
        );
    }
}
