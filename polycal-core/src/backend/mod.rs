//! The seam between polycal and the calendar service.
//!
//! A [`Backend`] lists, imports and deletes raw [`BackendEvent`] records.
//! Everything above it (declined filtering, uid namespacing, batching)
//! lives in [`crate::sync`].

mod convert;
#[cfg(test)]
pub(crate) mod memory;

pub use convert::{declined_by_owner, owner_emails};

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::PolycalResult;
use crate::event::{EventTime, RsvpStatus};
use crate::window::SyncWindow;

/// A calendar service holding events keyed by calendar id.
pub trait Backend {
    /// Every event overlapping `window`, with recurring events expanded.
    fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> impl Future<Output = PolycalResult<Vec<BackendEvent>>>;

    /// Create the event, or replace the one with the same iCal uid.
    fn import_event(
        &self,
        calendar_id: &str,
        event: &BackendEvent,
    ) -> impl Future<Output = PolycalResult<()>>;

    fn delete_event(
        &self,
        calendar_id: &str,
        event_id: &str,
    ) -> impl Future<Output = PolycalResult<()>>;
}

/// An event record as the calendar service stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendEvent {
    /// Service-assigned id; empty for events about to be imported.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub ical_uid: Option<String>,
    #[serde(default)]
    pub sequence: i64,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub status: EventStatus,
    #[serde(default)]
    pub transparency: Transparency,
    pub event_type: Option<String>,
    #[serde(default)]
    pub attendees: Vec<BackendAttendee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendAttendee {
    pub email: String,
    pub response_status: Option<RsvpStatus>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

/// Whether an event blocks time (opaque) or shows as free (transparent).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transparency {
    #[default]
    Opaque,
    Transparent,
}
