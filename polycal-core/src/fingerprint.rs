//! Content fingerprints used for change detection.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::error::{PolycalError, PolycalResult};
use crate::event::Event;

/// Fields that describe sync bookkeeping rather than event content.
///
/// Attendees are never written to the target, so they would always differ
/// between a source event and its synced copy.
const EXCLUDED_FIELDS: &[&str] = &["sequence", "source_ids", "attendees"];

/// Compute a short, stable fingerprint of the event's content.
///
/// The event is serialized to JSON with sorted keys and the bookkeeping
/// fields removed, hashed with BLAKE3 and encoded as unpadded URL-safe base64.
pub fn fingerprint(event: &Event) -> PolycalResult<String> {
    let canonical = canonical_json(event)?;
    let digest = blake3::hash(canonical.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(digest.as_bytes()))
}

fn canonical_json(event: &Event) -> PolycalResult<String> {
    let value =
        serde_json::to_value(event).map_err(|e| PolycalError::Serialization(e.to_string()))?;

    let serde_json::Value::Object(fields) = value else {
        return Err(PolycalError::Serialization(
            "event did not serialize to an object".into(),
        ));
    };
    // Sorted explicitly; serde_json::Map keeps insertion order under `preserve_order`.
    let fields: BTreeMap<String, serde_json::Value> = fields
        .into_iter()
        .filter(|(key, _)| !EXCLUDED_FIELDS.contains(&key.as_str()))
        .collect();

    serde_json::to_string(&fields).map_err(|e| PolycalError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Attendee, EventTime, RsvpStatus};
    use chrono::{TimeZone, Utc};

    fn sample() -> Event {
        Event {
            title: Some("Planning".to_string()),
            location: Some("Room 4".to_string()),
            ..Event::new(
                "abc@polycal",
                EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap()),
                EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap()),
            )
        }
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let event = sample();
        assert_eq!(fingerprint(&event).unwrap(), fingerprint(&event).unwrap());
        assert_eq!(fingerprint(&event).unwrap(), fingerprint(&event.clone()).unwrap());
    }

    #[test]
    fn test_fingerprint_ignores_bookkeeping_fields() {
        let event = sample();
        let mut other = sample();
        other.sequence = 1_700_000_000;
        other.source_ids = vec!["abc".to_string(), "def".to_string()];
        other.attendees.push(Attendee {
            email: "someone@example.com".to_string(),
            rsvp_status: RsvpStatus::Accepted,
        });
        assert_eq!(fingerprint(&event).unwrap(), fingerprint(&other).unwrap());
    }

    #[test]
    fn test_fingerprint_changes_with_content() {
        let event = sample();
        let base = fingerprint(&event).unwrap();

        let mut retitled = sample();
        retitled.title = Some("Planning v2".to_string());
        assert_ne!(base, fingerprint(&retitled).unwrap());

        let mut moved = sample();
        moved.end = EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 16, 30, 0).unwrap());
        assert_ne!(base, fingerprint(&moved).unwrap());

        let mut free = sample();
        free.busy = false;
        assert_ne!(base, fingerprint(&free).unwrap());

        let mut cleared = sample();
        cleared.location = None;
        assert_ne!(base, fingerprint(&cleared).unwrap());
    }

    #[test]
    fn test_fingerprint_is_printable() {
        let print = fingerprint(&sample()).unwrap();
        assert_eq!(print.len(), 43);
        assert!(print.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
