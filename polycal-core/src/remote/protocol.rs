//! JSON messages exchanged with provider binaries.

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::backend::BackendEvent;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    ListEvents,
    ImportEvent,
    DeleteEvent,
}

/// Request sent from polycal to a provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from a provider to polycal.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

/// List events overlapping `[from, to)`, recurring events expanded.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListEvents {
    pub calendar_id: String,
    /// RFC 3339
    pub from: String,
    pub to: String,
    pub user_agent: String,
}

impl ProviderCommand for ListEvents {
    type Response = Vec<BackendEvent>;
    fn command() -> Command {
        Command::ListEvents
    }
}

/// Insert the event, or update the one sharing its iCal uid.
#[derive(Debug, Serialize, Deserialize)]
pub struct ImportEvent {
    pub calendar_id: String,
    pub event: BackendEvent,
    pub user_agent: String,
}

impl ProviderCommand for ImportEvent {
    type Response = ();
    fn command() -> Command {
        Command::ImportEvent
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteEvent {
    pub calendar_id: String,
    pub event_id: String,
    pub user_agent: String,
}

impl ProviderCommand for DeleteEvent {
    type Response = ();
    fn command() -> Command {
        Command::DeleteEvent
    }
}
