//! polycal configuration.
//!
//! Looked up as `polycal.toml` inside `./.polycal/`, then `~/.polycal/`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{CONFIG_FILE_NAME, DEFAULT_PROVIDER, DEFAULT_USER_AGENT};
use crate::error::{PolycalError, PolycalResult};
use crate::transform::{Kwargs, deserialize_kwargs};

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

/// Top-level configuration: many sources feeding one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolycalConfig {
    pub sources: Vec<SourceSpec>,
    pub target: TargetSpec,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Name of the `polycal-provider-<name>` binary serving the calendars.
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default)]
    pub on_uid_collision: CollisionPolicy,
}

/// A calendar to read events from, with its transform chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub transforms: Vec<TransformSpec>,
}

impl SourceSpec {
    /// Name for display, falling back to the calendar id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// The calendar that receives the merged events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetSpec {
    pub id: String,
    pub name: String,
}

/// One transform stage: its registered type name plus keyword arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformSpec {
    #[serde(rename = "type")]
    pub kind: String,
    /// Dotted keys may be quoted or bare; bare ones are rejoined from TOML's nested tables.
    #[serde(default, deserialize_with = "deserialize_kwargs")]
    pub kwargs: Kwargs,
}

/// What to do when two sources emit the same uid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Log a warning; the event seen last wins.
    #[default]
    Warn,
    /// Abort reconciliation.
    Error,
}

impl PolycalConfig {
    pub fn from_toml(content: &str) -> PolycalResult<Self> {
        toml::from_str(content).map_err(|e| PolycalError::Config(e.to_string()))
    }

    pub fn load(path: &Path) -> PolycalResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PolycalError::Config(format!("Could not read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Directories searched for the config file, in order.
    pub fn search_dirs() -> Vec<PathBuf> {
        let mut candidates = vec![PathBuf::from(".polycal")];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".polycal"));
        }
        candidates
    }

    /// Path of the config file in the first existing search directory.
    pub fn config_path() -> PolycalResult<PathBuf> {
        let candidates = Self::search_dirs();
        candidates
            .iter()
            .find(|dir| dir.is_dir())
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                let searched: Vec<String> =
                    candidates.iter().map(|d| d.display().to_string()).collect();
                PolycalError::Config(format!(
                    "None of the config directories exist: {}",
                    searched.join(", ")
                ))
            })
    }
}
