use crate::config::TransformSpec;
use crate::error::PolycalResult;
use crate::transform::{EventStream, Transform, TransformRegistry};

/// An ordered chain of transforms; each stage feeds the next.
///
/// An empty pipeline passes events through unchanged.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    transforms: Vec<Transform>,
}

impl Pipeline {
    /// Construct every stage up front so config errors surface before any event flows.
    pub fn build(specs: &[TransformSpec], registry: &TransformRegistry) -> PolycalResult<Self> {
        let transforms = specs
            .iter()
            .map(|spec| registry.build(spec))
            .collect::<PolycalResult<Vec<_>>>()?;
        Ok(Pipeline { transforms })
    }

    pub fn apply<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        self.transforms
            .iter()
            .fold(events, |stream, transform| transform.process(stream))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(Transform::name).collect()
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}
