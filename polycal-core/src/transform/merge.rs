use std::collections::HashMap;

use chrono::TimeDelta;

use crate::error::PolycalResult;
use crate::event::Event;
use crate::human_duration::parse_human_duration;
use crate::transform::kwargs::{KwargReader, Kwargs};
use crate::transform::{EventStream, Transform};

/// Merges same-titled timed events that overlap or sit at most `epsilon` apart.
///
/// Events are visited in start order. Each one is absorbed by the first
/// earlier survivor with the same title whose end reaches `start - epsilon`;
/// the survivor's end becomes the later of both ends and it inherits the
/// absorbed event's `source_ids`. All-day events never merge.
#[derive(Debug, Clone)]
pub struct Merge {
    epsilon: TimeDelta,
}

impl Merge {
    pub const NAME: &'static str = "Merge";

    pub fn build(kwargs: &Kwargs) -> PolycalResult<Transform> {
        let mut reader = KwargReader::new(Self::NAME, kwargs);
        let epsilon = match reader.optional_str("epsilon")? {
            Some(raw) => parse_human_duration(raw)?,
            None => TimeDelta::zero(),
        };
        reader.finish()?;

        Ok(Transform::Merge(Merge { epsilon }))
    }

    /// Nothing is pulled from upstream until the first merged event is requested.
    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        let epsilon = self.epsilon;
        Box::new(std::iter::once_with(move || merge_events(events, epsilon)).flatten())
    }
}

fn absorbs(survivor: &Event, candidate: &Event, epsilon: TimeDelta) -> bool {
    if !survivor.start.is_timed() || !candidate.start.is_timed() {
        return false;
    }
    let candidate_start = candidate.start.to_utc();
    if survivor.start.to_utc() > candidate_start {
        return false;
    }
    // An epsilon reaching past the representable range reaches every survivor.
    match candidate_start.checked_sub_signed(epsilon) {
        Some(reach) => reach <= survivor.end.to_utc(),
        None => true,
    }
}

fn merge_events(events: impl Iterator<Item = Event>, epsilon: TimeDelta) -> Vec<Event> {
    let mut sorted: Vec<Event> = events.collect();
    sorted.sort_by_key(|event| event.start.to_utc());

    let mut groups: Vec<Vec<Event>> = Vec::new();
    let mut group_by_title: HashMap<Option<String>, usize> = HashMap::new();

    for event in sorted {
        let idx = *group_by_title
            .entry(event.title.clone())
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        let group = &mut groups[idx];

        match group
            .iter_mut()
            .find(|survivor| absorbs(survivor, &event, epsilon))
        {
            Some(survivor) => {
                tracing::debug!(survivor = %survivor.uid, absorbed = %event.uid, "merging events");
                if event.end.to_utc() > survivor.end.to_utc() {
                    survivor.end = event.end;
                }
                for id in &event.source_ids {
                    survivor.add_source_id(id);
                }
            }
            None => group.push(event),
        }
    }

    let mut merged: Vec<Event> = groups.into_iter().flatten().collect();
    merged.sort_by_key(|event| event.start.to_utc());
    merged
}
