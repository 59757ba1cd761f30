//! The closed table of transform types.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::config::TransformSpec;
use crate::error::{PolycalError, PolycalResult};
use crate::transform::kwargs::Kwargs;
use crate::transform::{
    Merge, ReplaceTitle, SetAttr, SkipByAttendee, SkipByAttr, SkipByDuration, SkipByTitle,
    Transform,
};

/// Builds a transform from its keyword arguments, validating all of them.
pub type TransformBuilder = fn(&Kwargs) -> PolycalResult<Transform>;

/// Every transform type polycal ships, by config name.
pub const STANDARD_TRANSFORMS: &[(&str, TransformBuilder)] = &[
    (ReplaceTitle::NAME, ReplaceTitle::build),
    (SetAttr::NAME, SetAttr::build),
    (SkipByAttr::NAME, SkipByAttr::build),
    (SkipByTitle::NAME, SkipByTitle::build),
    (SkipByAttendee::NAME, SkipByAttendee::build),
    (SkipByDuration::NAME, SkipByDuration::build),
    (Merge::NAME, Merge::build),
];

const _: () = assert!(
    first_duplicate(STANDARD_TRANSFORMS).is_none(),
    "transform registered twice"
);

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn first_duplicate(table: &[(&'static str, TransformBuilder)]) -> Option<&'static str> {
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if str_eq(table[i].0, table[j].0) {
                return Some(table[i].0);
            }
            j += 1;
        }
        i += 1;
    }
    None
}

static STANDARD: LazyLock<TransformRegistry> = LazyLock::new(|| TransformRegistry {
    builders: STANDARD_TRANSFORMS.iter().copied().collect(),
});

/// Immutable lookup from transform type name to builder.
#[derive(Debug, Clone)]
pub struct TransformRegistry {
    builders: BTreeMap<&'static str, TransformBuilder>,
}

impl TransformRegistry {
    /// The registry of [`STANDARD_TRANSFORMS`].
    pub fn standard() -> &'static TransformRegistry {
        &STANDARD
    }

    /// Build a registry from a custom table, rejecting duplicate names.
    pub fn from_table(table: &[(&'static str, TransformBuilder)]) -> PolycalResult<Self> {
        if let Some(name) = first_duplicate(table) {
            return Err(PolycalError::DuplicateTransform(name.to_string()));
        }
        Ok(TransformRegistry {
            builders: table.iter().copied().collect(),
        })
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builders.keys().copied()
    }

    pub fn build(&self, spec: &TransformSpec) -> PolycalResult<Transform> {
        let builder = self
            .builders
            .get(spec.kind.as_str())
            .ok_or_else(|| PolycalError::UnknownTransform(spec.kind.clone()))?;
        builder(&spec.kwargs)
    }
}
