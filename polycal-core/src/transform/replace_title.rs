use regex::{Regex, RegexBuilder};

use crate::error::PolycalResult;
use crate::transform::kwargs::{KwargReader, Kwargs};
use crate::transform::{EventStream, Transform};

const DEFAULT_PATTERN: &str = "^.*$";
const DEFAULT_REPL: &str = "n/a";

/// Rewrites every match of `pattern` in the title with `repl`.
///
/// An unset title is matched as the empty string, so the default pattern
/// turns untitled events into `n/a` too.
#[derive(Debug, Clone)]
pub struct ReplaceTitle {
    pattern: Regex,
    repl: String,
}

impl ReplaceTitle {
    pub const NAME: &'static str = "ReplaceTitle";

    pub fn build(kwargs: &Kwargs) -> PolycalResult<Transform> {
        let mut reader = KwargReader::new(Self::NAME, kwargs);
        let pattern = reader.optional_str("pattern")?.unwrap_or(DEFAULT_PATTERN);
        let repl = reader.optional_str("repl")?.unwrap_or(DEFAULT_REPL);

        let mut builder = RegexBuilder::new(pattern);
        if let Some(flag) = reader.optional_bool("ignore_case")? {
            builder.case_insensitive(flag);
        }
        if let Some(flag) = reader.optional_bool("multi_line")? {
            builder.multi_line(flag);
        }
        if let Some(flag) = reader.optional_bool("dot_matches_new_line")? {
            builder.dot_matches_new_line(flag);
        }
        if let Some(flag) = reader.optional_bool("swap_greed")? {
            builder.swap_greed(flag);
        }
        if let Some(flag) = reader.optional_bool("ignore_whitespace")? {
            builder.ignore_whitespace(flag);
        }
        let pattern = builder
            .build()
            .map_err(|e| reader.error(format!("invalid pattern: {}", e)))?;
        reader.finish()?;

        Ok(Transform::ReplaceTitle(ReplaceTitle {
            pattern,
            repl: repl.to_string(),
        }))
    }

    pub fn process<'a>(&'a self, events: EventStream<'a>) -> EventStream<'a> {
        Box::new(events.map(move |mut event| {
            let title = self
                .pattern
                .replace_all(event.title_or_empty(), self.repl.as_str())
                .into_owned();
            event.title = Some(title);
            event
        }))
    }
}
