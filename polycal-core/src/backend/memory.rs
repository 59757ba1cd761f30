//! In-memory backend for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::backend::{Backend, BackendEvent};
use crate::error::{PolycalError, PolycalResult};
use crate::window::SyncWindow;

#[derive(Default)]
pub(crate) struct MemoryBackend {
    calendars: Mutex<HashMap<String, Vec<BackendEvent>>>,
    failing_ids: Mutex<HashSet<String>>,
    next_id: Mutex<u64>,
    list_calls: AtomicUsize,
}

impl MemoryBackend {
    pub(crate) fn with_events(calendar_id: &str, events: Vec<BackendEvent>) -> Self {
        let backend = MemoryBackend::default();
        backend.insert(calendar_id, events);
        backend
    }

    pub(crate) fn insert(&self, calendar_id: &str, events: Vec<BackendEvent>) {
        let mut calendars = self.calendars.lock().unwrap();
        calendars
            .entry(calendar_id.to_string())
            .or_default()
            .extend(events);
    }

    /// Make imports of this uid and deletes of this id fail.
    pub(crate) fn fail_on(&self, key: &str) {
        self.failing_ids.lock().unwrap().insert(key.to_string());
    }

    pub(crate) fn events(&self, calendar_id: &str) -> Vec<BackendEvent> {
        let calendars = self.calendars.lock().unwrap();
        calendars.get(calendar_id).cloned().unwrap_or_default()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    fn fails(&self, key: &str) -> bool {
        self.failing_ids.lock().unwrap().contains(key)
    }
}

impl Backend for MemoryBackend {
    async fn list_events(
        &self,
        calendar_id: &str,
        window: &SyncWindow,
    ) -> PolycalResult<Vec<BackendEvent>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let events = self.events(calendar_id);
        Ok(events
            .into_iter()
            .filter(|e| e.start.to_utc() < window.end && e.end.to_utc() > window.start)
            .collect())
    }

    async fn import_event(&self, calendar_id: &str, event: &BackendEvent) -> PolycalResult<()> {
        let uid = event.ical_uid.clone().unwrap_or_default();
        if self.fails(&uid) {
            return Err(PolycalError::Provider(format!("import of {} rejected", uid)));
        }

        let mut calendars = self.calendars.lock().unwrap();
        let stored = calendars.entry(calendar_id.to_string()).or_default();
        match stored.iter_mut().find(|e| e.ical_uid == event.ical_uid) {
            Some(existing) => {
                let id = existing.id.clone();
                *existing = event.clone();
                existing.id = id;
            }
            None => {
                let mut next_id = self.next_id.lock().unwrap();
                *next_id += 1;
                let mut created = event.clone();
                created.id = format!("mem{}", next_id);
                stored.push(created);
            }
        }
        Ok(())
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> PolycalResult<()> {
        if self.fails(event_id) {
            return Err(PolycalError::Provider(format!("delete of {} rejected", event_id)));
        }

        let mut calendars = self.calendars.lock().unwrap();
        let stored = calendars.entry(calendar_id.to_string()).or_default();
        let before = stored.len();
        stored.retain(|e| e.id != event_id);
        if stored.len() == before {
            return Err(PolycalError::Provider(format!("no event {}", event_id)));
        }
        Ok(())
    }
}
