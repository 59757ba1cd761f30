//! Translation between backend records and [`Event`].

use crate::backend::{BackendEvent, EventStatus, Transparency};
use crate::constants::UID_NAMESPACE;
use crate::error::{PolycalError, PolycalResult};
use crate::event::{Attendee, DEFAULT_EVENT_TYPE, Event, RsvpStatus};

/// Emails of the people whose calendar `calendar_id` is.
///
/// A personal calendar's id is its owner's address; shared and group
/// calendars (`...calendar.google.com`) have no known owner.
pub fn owner_emails(calendar_id: &str) -> Vec<String> {
    if calendar_id.contains('@') && !calendar_id.ends_with("calendar.google.com") {
        vec![calendar_id.to_string()]
    } else {
        Vec::new()
    }
}

/// Whether any of `owners` has declined the event.
pub fn declined_by_owner(record: &BackendEvent, owners: &[String]) -> bool {
    record.attendees.iter().any(|attendee| {
        attendee.response_status == Some(RsvpStatus::Declined)
            && owners.iter().any(|owner| *owner == attendee.email)
    })
}

fn namespaced_uid(record: &BackendEvent) -> PolycalResult<String> {
    match &record.ical_uid {
        Some(uid) if uid.ends_with(UID_NAMESPACE) => Ok(uid.clone()),
        _ if record.id.is_empty() => Err(PolycalError::InvalidEvent(
            "backend event has neither an id nor a polycal uid".into(),
        )),
        _ => Ok(format!("{}{}", record.id, UID_NAMESPACE)),
    }
}

impl TryFrom<BackendEvent> for Event {
    type Error = PolycalError;

    fn try_from(record: BackendEvent) -> PolycalResult<Self> {
        let uid = namespaced_uid(&record)?;
        let event = Event {
            uid,
            sequence: record.sequence,
            source_ids: vec![record.id],
            start: record.start,
            end: record.end,
            event_type: record
                .event_type
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            title: record.summary,
            description: record.description,
            location: record.location,
            deleted: record.status == EventStatus::Cancelled,
            busy: record.transparency == Transparency::Opaque,
            attendees: record
                .attendees
                .into_iter()
                .map(|a| Attendee {
                    email: a.email,
                    rsvp_status: a.response_status.unwrap_or_default(),
                })
                .collect(),
        };
        event.validate()?;
        Ok(event)
    }
}

/// The record imported into the target calendar; attendees are not carried over.
impl From<&Event> for BackendEvent {
    fn from(event: &Event) -> Self {
        BackendEvent {
            id: String::new(),
            ical_uid: Some(event.uid.clone()),
            sequence: event.sequence,
            summary: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            start: event.start,
            end: event.end,
            status: if event.deleted {
                EventStatus::Cancelled
            } else {
                EventStatus::Confirmed
            },
            transparency: if event.busy {
                Transparency::Opaque
            } else {
                Transparency::Transparent
            },
            event_type: Some(event.event_type.clone()),
            attendees: Vec::new(),
        }
    }
}
