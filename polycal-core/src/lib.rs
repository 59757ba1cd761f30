//! Core of polycal: aggregate events from many calendars into one.
//!
//! Each configured source calendar is fetched through a [`Backend`], run
//! through its own chain of transforms, and the results are reconciled
//! against the target calendar into a [`SyncBatch`] of imports and
//! tombstones.

pub mod backend;
pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod human_duration;
pub mod processor;
pub mod remote;
pub mod sync;
pub mod transform;
pub mod window;

pub use backend::{Backend, BackendEvent};
pub use config::{CollisionPolicy, PolycalConfig, SourceSpec, TargetSpec, TransformSpec};
pub use error::{PolycalError, PolycalResult};
pub use event::{Attendee, Event, EventTime, RsvpStatus};
pub use processor::{Processor, SyncOutcome};
pub use remote::Provider;
pub use sync::{BatchFailure, BatchOperation, BatchReport, SyncBatch};
pub use transform::{Pipeline, Transform, TransformRegistry};
pub use window::SyncWindow;
