//! Fetching, reconciling and applying events against a [`Backend`](crate::backend::Backend).

mod apply;
mod fetch;
mod reconcile;

pub use apply::{BatchFailure, BatchOperation, BatchReport, apply_batch};
pub use fetch::fetch_events;
pub use reconcile::{SyncBatch, reconcile, sequence_now};
