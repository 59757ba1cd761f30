//! Composable event transforms.
//!
//! A transform consumes a lazy stream of events and yields another one.
//! Transforms are built from a type name and keyword arguments through a
//! [`TransformRegistry`], and chained per source into a [`Pipeline`].

mod field;
mod filter;
mod kwargs;
mod merge;
mod pipeline;
mod registry;
mod replace_title;
mod set_attr;

pub use field::{Assignment, Field, FieldPath};
pub use filter::{SkipByAttendee, SkipByAttr, SkipByDuration, SkipByTitle};
pub use kwargs::{KwargReader, KwargValue, Kwargs};
pub(crate) use kwargs::deserialize_kwargs;
pub use merge::Merge;
pub use pipeline::Pipeline;
pub use registry::{STANDARD_TRANSFORMS, TransformBuilder, TransformRegistry};
pub use replace_title::ReplaceTitle;
pub use set_attr::SetAttr;

use crate::event::Event;

/// A lazy, single-pass sequence of events.
pub type EventStream<'a> = Box<dyn Iterator<Item = Event> + 'a>;

/// A constructed transform stage.
#[derive(Debug, Clone)]
pub enum Transform {
    ReplaceTitle(ReplaceTitle),
    SetAttr(SetAttr),
    SkipByAttr(SkipByAttr),
    SkipByTitle(SkipByTitle),
    SkipByAttendee(SkipByAttendee),
    SkipByDuration(SkipByDuration),
    Merge(Merge),
}

impl Transform {
    pub fn name(&self) -> &'static str {
        match self {
            Transform::ReplaceTitle(_) => ReplaceTitle::NAME,
            Transform::SetAttr(_) => SetAttr::NAME,
            Transform::SkipByAttr(_) => SkipByAttr::NAME,
            Transform::SkipByTitle(_) => SkipByTitle::NAME,
            Transform::SkipByAttendee(_) => SkipByAttendee::NAME,
            Transform::SkipByDuration(_) => SkipByDuration::NAME,
            Transform::Merge(_) => Merge::NAME,
        }
    }

    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        match self {
            Transform::ReplaceTitle(t) => t.process(events),
            Transform::SetAttr(t) => t.process(events),
            Transform::SkipByAttr(t) => t.process(events),
            Transform::SkipByTitle(t) => t.process(events),
            Transform::SkipByAttendee(t) => t.process(events),
            Transform::SkipByDuration(t) => t.process(events),
            Transform::Merge(t) => t.process(events),
        }
    }
}
