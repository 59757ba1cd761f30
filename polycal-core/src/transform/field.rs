//! Name-keyed access to [`Event`] fields.
//!
//! Transforms configured with field names (`SetAttr`, `SkipByAttr`) resolve
//! them through this table when the pipeline is built.

use serde_json::Value;

use crate::error::{PolycalError, PolycalResult};
use crate::event::Event;
use crate::transform::kwargs::KwargValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Uid,
    Sequence,
    SourceIds,
    Start,
    End,
    EventType,
    Title,
    Description,
    Location,
    Deleted,
    Busy,
    Attendees,
}

const FIELDS: &[(&str, Field)] = &[
    ("uid", Field::Uid),
    ("sequence", Field::Sequence),
    ("source_ids", Field::SourceIds),
    ("start", Field::Start),
    ("end", Field::End),
    ("event_type", Field::EventType),
    ("type", Field::EventType),
    ("title", Field::Title),
    ("description", Field::Description),
    ("location", Field::Location),
    ("deleted", Field::Deleted),
    ("busy", Field::Busy),
    ("attendees", Field::Attendees),
];

impl Field {
    pub fn from_name(name: &str) -> PolycalResult<Field> {
        FIELDS
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, field)| *field)
            .ok_or_else(|| PolycalError::UnknownField(name.to_string()))
    }

    /// The field's value in the event's JSON form.
    pub fn value(self, event: &Event) -> Value {
        let value = match self {
            Field::Uid => serde_json::to_value(&event.uid),
            Field::Sequence => serde_json::to_value(event.sequence),
            Field::SourceIds => serde_json::to_value(&event.source_ids),
            Field::Start => serde_json::to_value(event.start),
            Field::End => serde_json::to_value(event.end),
            Field::EventType => serde_json::to_value(&event.event_type),
            Field::Title => serde_json::to_value(&event.title),
            Field::Description => serde_json::to_value(&event.description),
            Field::Location => serde_json::to_value(&event.location),
            Field::Deleted => serde_json::to_value(event.deleted),
            Field::Busy => serde_json::to_value(event.busy),
            Field::Attendees => serde_json::to_value(&event.attendees),
        };
        value.unwrap_or(Value::Null)
    }

    /// Check `value` against this field's type and turn it into an assignment.
    pub fn assignment(self, value: &KwargValue) -> Result<Assignment, String> {
        match (self, value) {
            (Field::Sequence, KwargValue::Int(i)) => Ok(Assignment::Sequence(*i)),
            (Field::EventType, KwargValue::Str(s)) => Ok(Assignment::EventType(s.clone())),
            (Field::Title, KwargValue::Str(s)) => Ok(Assignment::Title(s.clone())),
            (Field::Description, KwargValue::Str(s)) => Ok(Assignment::Description(s.clone())),
            (Field::Location, KwargValue::Str(s)) => Ok(Assignment::Location(s.clone())),
            (Field::Deleted, KwargValue::Bool(b)) => Ok(Assignment::Deleted(*b)),
            (Field::Busy, KwargValue::Bool(b)) => Ok(Assignment::Busy(*b)),
            (Field::Uid, _) => Err("uid cannot be overridden".to_string()),
            (Field::SourceIds | Field::Start | Field::End | Field::Attendees, _) => {
                Err(format!("{:?} cannot be set from a config value", self))
            }
            (field, other) => Err(format!(
                "{:?} cannot be set to a {}",
                field,
                other.type_name()
            )),
        }
    }
}

/// A typed overwrite of one event field.
#[derive(Debug, Clone, PartialEq)]
pub enum Assignment {
    Sequence(i64),
    EventType(String),
    Title(String),
    Description(String),
    Location(String),
    Deleted(bool),
    Busy(bool),
}

impl Assignment {
    pub fn apply(&self, event: &mut Event) {
        match self {
            Assignment::Sequence(i) => event.sequence = *i,
            Assignment::EventType(s) => event.event_type = s.clone(),
            Assignment::Title(s) => event.title = Some(s.clone()),
            Assignment::Description(s) => event.description = Some(s.clone()),
            Assignment::Location(s) => event.location = Some(s.clone()),
            Assignment::Deleted(b) => event.deleted = *b,
            Assignment::Busy(b) => event.busy = *b,
        }
    }
}

/// A dotted path into an event, e.g. `busy` or `attendees.0.email`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPath {
    field: Field,
    rest: Vec<String>,
}

impl FieldPath {
    pub fn parse(path: &str) -> PolycalResult<FieldPath> {
        let mut segments = path.split('.');
        let head = segments.next().unwrap_or_default();
        Ok(FieldPath {
            field: Field::from_name(head)?,
            rest: segments.map(str::to_string).collect(),
        })
    }

    /// Resolve the path; missing keys and indices give `Null`.
    pub fn resolve(&self, event: &Event) -> Value {
        let mut value = self.field.value(event);
        for segment in &self.rest {
            let next = match &value {
                Value::Object(map) => map.get(segment).cloned(),
                Value::Array(items) => segment
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| items.get(idx).cloned()),
                _ => None,
            };
            value = next.unwrap_or(Value::Null);
        }
        value
    }
}
