//! Provider subprocess calls.
//!
//! Every call spawns the provider binary, writes one request line to its
//! stdin, and reads the whole of stdout as the response. stderr is passed
//! through so providers can log or prompt.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::backend::{Backend, BackendEvent};
use crate::error::{PolycalError, PolycalResult};
use crate::remote::protocol::{
    Command, DeleteEvent, ImportEvent, ListEvents, ProviderCommand, Request, Response,
};
use crate::window::SyncWindow;

const PROVIDER_TIMEOUT: Duration = Duration::from_secs(60);

/// A calendar service reached through `polycal-provider-<name>`.
#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    user_agent: String,
}

impl Provider {
    pub fn new(name: &str, user_agent: &str) -> Self {
        Provider {
            name: name.to_string(),
            user_agent: user_agent.to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary_name(&self) -> String {
        format!("polycal-provider-{}", self.name)
    }

    fn binary_path(&self) -> PolycalResult<PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| PolycalError::ProviderNotInstalled(binary_name))
    }

    /// Call a typed provider command and return its typed response.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> PolycalResult<C::Response> {
        timeout(PROVIDER_TIMEOUT, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| PolycalError::ProviderTimeout(PROVIDER_TIMEOUT.as_secs()))?
    }

    async fn call_raw<P: Serialize, R: DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> PolycalResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| PolycalError::Serialization(e.to_string()))?;
        let request_json = serde_json::to_string(&Request { command, params })
            .map_err(|e| PolycalError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;
        tracing::debug!(provider = %self.name, ?command, "calling provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PolycalError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PolycalError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(PolycalError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        parse_response(&String::from_utf8_lossy(&output.stdout))
    }
}

fn parse_response<R: DeserializeOwned>(raw: &str) -> PolycalResult<R> {
    if raw.trim().is_empty() {
        return Err(PolycalError::Provider("Provider returned no response".into()));
    }

    let response: Response<R> = serde_json::from_str(raw)
        .map_err(|e| PolycalError::Provider(format!("Failed to parse response: {}", e)))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(PolycalError::Provider(error)),
    }
}

impl Backend for Provider {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> PolycalResult<Vec<BackendEvent>> {
        self.call(ListEvents {
            calendar_id: calendar_id.to_string(),
            from: window.start_rfc3339(),
            to: window.end_rfc3339(),
            user_agent: self.user_agent.clone(),
        })
        .await
    }

    async fn import_event(&self, calendar_id: &str, event: &BackendEvent) -> PolycalResult<()> {
        self.call(ImportEvent {
            calendar_id: calendar_id.to_string(),
            event: event.clone(),
            user_agent: self.user_agent.clone(),
        })
        .await
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> PolycalResult<()> {
        self.call(DeleteEvent {
            calendar_id: calendar_id.to_string(),
            event_id: event_id.to_string(),
            user_agent: self.user_agent.clone(),
        })
        .await
    }
}
