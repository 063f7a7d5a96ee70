//! `jobledger-registry` — bookkeeping for typed, dated, arbitrary-payload
//! jobs.
//!
//! The registry records jobs in a backing collection and answers queries over
//! them: which are due, which are completed, and which match payload-field
//! predicates. It never executes jobs; a separate worker/poller consults it
//! to decide what to run and when.
//!
//! ## Components
//!
//! - [`JobRegistry`]: the seven logical operations (schedule, reschedule,
//!   cancel, complete, due, completed, find) and their translation into
//!   collection filters
//! - [`Logger`]: the logging sink contract, defaulting to a `tracing`-backed
//!   implementation

pub mod error;
pub mod logger;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use logger::{Logger, NoopLogger, TracingLogger};
pub use registry::JobRegistry;
