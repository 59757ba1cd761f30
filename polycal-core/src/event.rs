//! Canonical event model.
//!
//! Every backend record is translated into an [`Event`] before it enters a
//! transform pipeline, and reconciliation works exclusively with this type.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAX_UID_LEN;
use crate::error::{PolycalError, PolycalResult};

pub const DEFAULT_EVENT_TYPE: &str = "default";

fn default_event_type() -> String {
    DEFAULT_EVENT_TYPE.to_string()
}

fn default_busy() -> bool {
    true
}

/// A calendar event as it flows through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Reconciliation key, unique per logical event within the target calendar.
    pub uid: String,
    /// Version hint for the sink, bumped whenever content changes.
    #[serde(default)]
    pub sequence: i64,
    /// Backend records this event stands for (more than one after a merge).
    #[serde(default)]
    pub source_ids: Vec<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default = "default_event_type")]
    pub event_type: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Tombstone flag: the event asks for removal rather than describing a live event.
    #[serde(default)]
    pub deleted: bool,
    /// Whether the time range is shown as occupied.
    #[serde(default = "default_busy")]
    pub busy: bool,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

impl Event {
    /// Create a live, busy event with no display fields set.
    pub fn new(uid: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        Event {
            uid: uid.into(),
            sequence: 0,
            source_ids: Vec::new(),
            start,
            end,
            event_type: default_event_type(),
            title: None,
            description: None,
            location: None,
            deleted: false,
            busy: true,
            attendees: Vec::new(),
        }
    }

    /// `end - start`, with date-only endpoints taken as midnight UTC.
    pub fn duration(&self) -> TimeDelta {
        self.end.to_utc() - self.start.to_utc()
    }

    /// Title, or the empty string when unset.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn validate(&self) -> PolycalResult<()> {
        validate_uid(&self.uid)
    }

    /// Add a backend id unless it is already recorded.
    pub fn add_source_id(&mut self, id: &str) {
        if !self.source_ids.iter().any(|existing| existing == id) {
            self.source_ids.push(id.to_string());
        }
    }
}

pub(crate) fn validate_uid(uid: &str) -> PolycalResult<()> {
    if uid.is_empty() {
        return Err(PolycalError::InvalidEvent("uid must not be empty".into()));
    }
    if uid.len() > MAX_UID_LEN {
        return Err(PolycalError::InvalidEvent(format!(
            "uid '{}' is longer than {} characters",
            uid, MAX_UID_LEN
        )));
    }
    Ok(())
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = self.title.as_deref().unwrap_or("(untitled)");
        write!(f, "{} [{} - {}]", title, self.start, self.end)
    }
}

/// Start or end of an event: a whole day, or an absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

impl EventTime {
    pub fn is_timed(&self) -> bool {
        matches!(self, EventTime::DateTime(_))
    }

    /// The instant this time refers to; dates resolve to midnight UTC.
    pub fn to_utc(&self) -> DateTime<Utc> {
        match self {
            EventTime::Date(d) => d.and_time(chrono::NaiveTime::MIN).and_utc(),
            EventTime::DateTime(dt) => *dt,
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M UTC")),
        }
    }
}

/// An event attendee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub email: String,
    #[serde(default)]
    pub rsvp_status: RsvpStatus,
}

/// Attendee response status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RsvpStatus {
    #[default]
    NeedsAction,
    Declined,
    Tentative,
    Accepted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_duration_of_timed_event() {
        let event = Event::new(
            "a@polycal",
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap()),
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 10, 45, 0).unwrap()),
        );
        assert_eq!(event.duration(), TimeDelta::minutes(45));
    }

    #[test]
    fn test_duration_of_all_day_event() {
        let event = Event::new(
            "a@polycal",
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()),
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 22).unwrap()),
        );
        assert_eq!(event.duration(), TimeDelta::days(2));
    }

    #[test]
    fn test_duration_of_mixed_kinds_uses_midnight() {
        let event = Event::new(
            "a@polycal",
            EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()),
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 6, 0, 0).unwrap()),
        );
        assert_eq!(event.duration(), TimeDelta::hours(6));
    }

    #[test]
    fn test_validate_rejects_long_uid() {
        let day = EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        let event = Event::new("x".repeat(256), day, day);
        assert!(matches!(event.validate(), Err(PolycalError::InvalidEvent(_))));

        let event = Event::new("x".repeat(255), day, day);
        assert!(event.validate().is_ok());
    }

    #[test]
    fn test_add_source_id_skips_duplicates() {
        let day = EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap());
        let mut event = Event::new("a@polycal", day, day);
        event.add_source_id("a");
        event.add_source_id("b");
        event.add_source_id("a");
        assert_eq!(event.source_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_rsvp_status_wire_names() {
        let json = serde_json::to_string(&RsvpStatus::NeedsAction).unwrap();
        assert_eq!(json, "\"needsAction\"");
        let parsed: Attendee = serde_json::from_str(r#"{"email":"a@example.com"}"#).unwrap();
        assert_eq!(parsed.rsvp_status, RsvpStatus::NeedsAction);
    }
}
