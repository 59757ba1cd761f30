//! Calendar access through external provider binaries.
//!
//! A provider is any executable named `polycal-provider-<name>` on `PATH`
//! that reads one JSON request from stdin and writes one JSON response to
//! stdout. Providers own their credentials; polycal only sends calendar
//! ids, the sync window and events.

pub mod protocol;
pub mod provider;

pub use provider::Provider;
