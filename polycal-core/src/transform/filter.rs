//! Transforms that decide per event whether it continues downstream.

use chrono::TimeDelta;
use regex::Regex;
use serde_json::Value;

use crate::error::PolycalResult;
use crate::event::RsvpStatus;
use crate::human_duration::parse_human_duration;
use crate::transform::field::FieldPath;
use crate::transform::kwargs::{KwargReader, Kwargs};
use crate::transform::{EventStream, Transform};

/// Keeps an event only if every configured path equals its value.
#[derive(Debug, Clone)]
pub struct SkipByAttr {
    conditions: Vec<(FieldPath, Value)>,
}

impl SkipByAttr {
    pub const NAME: &'static str = "SkipByAttr";

    pub fn build(kwargs: &Kwargs) -> PolycalResult<Transform> {
        let mut reader = KwargReader::new(Self::NAME, kwargs);
        let conditions = reader
            .take_rest()
            .into_iter()
            .map(|(path, expected)| -> PolycalResult<(FieldPath, Value)> {
                Ok((FieldPath::parse(path)?, expected.to_json()))
            })
            .collect::<PolycalResult<Vec<_>>>()?;
        reader.finish()?;

        Ok(Transform::SkipByAttr(SkipByAttr { conditions }))
    }

    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        Box::new(events.filter(move |event| {
            self.conditions
                .iter()
                .all(|(path, expected)| path.resolve(event) == *expected)
        }))
    }
}

/// Keeps an event only if its title starts with a match of one of the patterns.
#[derive(Debug, Clone)]
pub struct SkipByTitle {
    patterns: Vec<Regex>,
}

impl SkipByTitle {
    pub const NAME: &'static str = "SkipByTitle";

    pub fn build(kwargs: &Kwargs) -> PolycalResult<Transform> {
        let mut reader = KwargReader::new(Self::NAME, kwargs);
        let titles = reader.required_str_list("titles")?;
        let patterns = titles
            .iter()
            .map(|title| {
                Regex::new(&format!("^(?:{})", title))
                    .map_err(|e| reader.error(format!("invalid pattern {:?}: {}", title, e)))
            })
            .collect::<PolycalResult<Vec<_>>>()?;
        reader.finish()?;

        Ok(Transform::SkipByTitle(SkipByTitle { patterns }))
    }

    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        Box::new(events.filter(move |event| {
            let title = event.title_or_empty();
            self.patterns.iter().any(|pattern| pattern.is_match(title))
        }))
    }
}

/// Keeps an event only if the given person attends it (and accepted, when `confirmed`).
#[derive(Debug, Clone)]
pub struct SkipByAttendee {
    email: String,
    confirmed: bool,
}

impl SkipByAttendee {
    pub const NAME: &'static str = "SkipByAttendee";

    pub fn build(kwargs: &Kwargs) -> PolycalResult<Transform> {
        let mut reader = KwargReader::new(Self::NAME, kwargs);
        let email = reader.required_str("email")?.to_string();
        let confirmed = reader.optional_bool("confirmed")?.unwrap_or(false);
        reader.finish()?;

        Ok(Transform::SkipByAttendee(SkipByAttendee { email, confirmed }))
    }

    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        Box::new(events.filter(move |event| {
            event.attendees.iter().any(|attendee| {
                attendee.email == self.email
                    && (!self.confirmed || attendee.rsvp_status == RsvpStatus::Accepted)
            })
        }))
    }
}

/// Keeps only events strictly longer than `min_duration`.
#[derive(Debug, Clone)]
pub struct SkipByDuration {
    min_duration: TimeDelta,
}

impl SkipByDuration {
    pub const NAME: &'static str = "SkipByDuration";

    pub fn build(kwargs: &Kwargs) -> PolycalResult<Transform> {
        let mut reader = KwargReader::new(Self::NAME, kwargs);
        let min_duration = parse_human_duration(reader.required_str("min_duration")?)?;
        reader.finish()?;

        Ok(Transform::SkipByDuration(SkipByDuration { min_duration }))
    }

    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        Box::new(events.filter(move |event| event.duration() > self.min_duration))
    }
}
