use std::collections::HashSet;
use std::fmt;

use crate::backend::{Backend, BackendEvent};
use crate::sync::SyncBatch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    Import,
    /// Deleting the target record with this id.
    Delete { source_id: String },
}

impl fmt::Display for BatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOperation::Import => write!(f, "import"),
            BatchOperation::Delete { source_id } => write!(f, "delete {}", source_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub uid: String,
    pub operation: BatchOperation,
    pub error: String,
}

/// What happened when a batch was written to the target calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub imported: usize,
    pub deleted: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Write `batch` to the target calendar.
///
/// Live events are imported by uid. Tombstones delete every target record
/// they were built from. Ids already handled earlier in the batch are not
/// touched again. A failing item is recorded and the rest of the batch
/// still runs.
pub async fn apply_batch<B: Backend>(
    backend: &B,
    calendar_id: &str,
    batch: &SyncBatch,
) -> BatchReport {
    let mut report = BatchReport::default();
    let mut handled: HashSet<&str> = HashSet::new();

    for event in batch.iter() {
        if !event.deleted {
            handled.extend(event.source_ids.iter().map(String::as_str));
            match backend
                .import_event(calendar_id, &BackendEvent::from(event))
                .await
            {
                Ok(()) => report.imported += 1,
                Err(e) => {
                    tracing::warn!(uid = %event.uid, error = %e, "import failed");
                    report.failures.push(BatchFailure {
                        uid: event.uid.clone(),
                        operation: BatchOperation::Import,
                        error: e.to_string(),
                    });
                }
            }
            continue;
        }

        for source_id in &event.source_ids {
            if !handled.insert(source_id.as_str()) {
                continue;
            }
            match backend.delete_event(calendar_id, source_id).await {
                Ok(()) => report.deleted += 1,
                Err(e) => {
                    tracing::warn!(uid = %event.uid, id = %source_id, error = %e, "delete failed");
                    report.failures.push(BatchFailure {
                        uid: event.uid.clone(),
                        operation: BatchOperation::Delete {
                            source_id: source_id.clone(),
                        },
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    tracing::info!(
        calendar = calendar_id,
        imported = report.imported,
        deleted = report.deleted,
        failed = report.failures.len(),
        "applied batch"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::event::{Event, EventTime};
    use chrono::{TimeZone, Utc};

    const TARGET: &str = "target@example.com";

    fn event(uid: &str, source_ids: &[&str], deleted: bool) -> Event {
        Event {
            source_ids: source_ids.iter().map(|s| s.to_string()).collect(),
            deleted,
            title: Some(uid.to_string()),
            ..Event::new(
                uid.to_string(),
                EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap()),
                EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 10, 0, 0).unwrap()),
            )
        }
    }

    fn stored(id: &str, uid: &str) -> BackendEvent {
        let mut record = BackendEvent::from(&event(uid, &[], false));
        record.id = id.to_string();
        record
    }

    #[tokio::test]
    async fn test_imports_and_deletes() {
        let backend = MemoryBackend::with_events(TARGET, vec![stored("t1", "old@polycal")]);
        let batch = SyncBatch {
            changed: vec![event("new@polycal", &["s1"], false)],
            tombstones: vec![event("old@polycal", &["t1"], true)],
        };

        let report = apply_batch(&backend, TARGET, &batch).await;

        assert!(report.is_success());
        assert_eq!((report.imported, report.deleted), (1, 1));
        let remaining = backend.events(TARGET);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].ical_uid.as_deref(), Some("new@polycal"));
    }

    #[tokio::test]
    async fn test_import_replaces_same_uid() {
        let backend = MemoryBackend::with_events(TARGET, vec![stored("t1", "a@polycal")]);
        let mut updated = event("a@polycal", &["s1"], false);
        updated.title = Some("Renamed".into());
        let batch = SyncBatch {
            changed: vec![updated],
            tombstones: vec![],
        };

        apply_batch(&backend, TARGET, &batch).await;

        let remaining = backend.events(TARGET);
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "t1");
        assert_eq!(remaining[0].summary.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_ids_are_deleted_once() {
        let backend = MemoryBackend::with_events(
            TARGET,
            vec![stored("t1", "a@polycal"), stored("t2", "b@polycal")],
        );
        let batch = SyncBatch {
            changed: vec![],
            tombstones: vec![
                event("a@polycal", &["t1", "t1"], true),
                event("b@polycal", &["t2", "t1"], true),
            ],
        };

        let report = apply_batch(&backend, TARGET, &batch).await;

        assert!(report.is_success());
        assert_eq!(report.deleted, 2);
        assert!(backend.events(TARGET).is_empty());
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_batch() {
        let backend = MemoryBackend::with_events(
            TARGET,
            vec![stored("t1", "a@polycal"), stored("t2", "b@polycal")],
        );
        backend.fail_on("bad@polycal");
        backend.fail_on("t1");
        let batch = SyncBatch {
            changed: vec![
                event("bad@polycal", &["s1"], false),
                event("good@polycal", &["s2"], false),
            ],
            tombstones: vec![
                event("a@polycal", &["t1"], true),
                event("b@polycal", &["t2"], true),
            ],
        };

        let report = apply_batch(&backend, TARGET, &batch).await;

        assert!(!report.is_success());
        assert_eq!((report.imported, report.deleted), (1, 1));
        let failed: Vec<(&str, &BatchOperation)> = report
            .failures
            .iter()
            .map(|f| (f.uid.as_str(), &f.operation))
            .collect();
        assert_eq!(
            failed,
            vec![
                ("bad@polycal", &BatchOperation::Import),
                (
                    "a@polycal",
                    &BatchOperation::Delete {
                        source_id: "t1".into()
                    }
                ),
            ]
        );
    }
}
