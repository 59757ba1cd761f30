use crate::error::{PolycalError, PolycalResult};
use crate::transform::field::{Assignment, Field};
use crate::transform::kwargs::{KwargReader, Kwargs};
use crate::transform::{EventStream, Transform};

/// Overwrites fields on every event, e.g. `busy = false` or `title = "Busy"`.
#[derive(Debug, Clone)]
pub struct SetAttr {
    assignments: Vec<Assignment>,
}

impl SetAttr {
    pub const NAME: &'static str = "SetAttr";

    pub fn build(kwargs: &Kwargs) -> PolycalResult<Transform> {
        let mut reader = KwargReader::new(Self::NAME, kwargs);
        let assignments = reader
            .take_rest()
            .into_iter()
            .map(|(name, value)| -> PolycalResult<Assignment> {
                let field = Field::from_name(name)?;
                field
                    .assignment(value)
                    .map_err(|message| PolycalError::kwarg(Self::NAME, message))
            })
            .collect::<PolycalResult<Vec<_>>>()?;
        reader.finish()?;

        Ok(Transform::SetAttr(SetAttr { assignments }))
    }

    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        Box::new(events.map(move |mut event| {
            for assignment in &self.assignments {
                assignment.apply(&mut event);
            }
            event
        }))
    }
}
