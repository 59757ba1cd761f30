//! One synchronization run: fetch every source, transform, fan in, reconcile.

use crate::backend::Backend;
use crate::config::PolycalConfig;
use crate::error::PolycalResult;
use crate::event::Event;
use crate::sync::{BatchReport, SyncBatch, apply_batch, fetch_events, reconcile, sequence_now};
use crate::transform::{EventStream, Pipeline, TransformRegistry};
use crate::window::SyncWindow;

/// The batch computed for a window and what became of it.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    pub batch: SyncBatch,
    pub report: BatchReport,
}

pub struct Processor<'a, B: Backend> {
    config: &'a PolycalConfig,
    backend: &'a B,
    registry: &'a TransformRegistry,
}

impl<'a, B: Backend> Processor<'a, B> {
    pub fn new(config: &'a PolycalConfig, backend: &'a B) -> Self {
        Self::with_registry(config, backend, TransformRegistry::standard())
    }

    pub fn with_registry(
        config: &'a PolycalConfig,
        backend: &'a B,
        registry: &'a TransformRegistry,
    ) -> Self {
        Processor {
            config,
            backend,
            registry,
        }
    }

    /// One pipeline per configured source, in source order.
    pub fn build_pipelines(&self) -> PolycalResult<Vec<Pipeline>> {
        self.config
            .sources
            .iter()
            .map(|source| {
                let pipeline = Pipeline::build(&source.transforms, self.registry)?;
                tracing::debug!(
                    source = source.label(),
                    stages = ?pipeline.stage_names(),
                    "built pipeline"
                );
                Ok(pipeline)
            })
            .collect()
    }

    /// Compute the batch for `window` without writing anything.
    ///
    /// Every pipeline is built before the first fetch, so a bad transform
    /// config fails the run without touching the backend.
    pub async fn plan(&self, window: &SyncWindow) -> PolycalResult<SyncBatch> {
        let pipelines = self.build_pipelines()?;

        let mut fetched: Vec<Vec<Event>> = Vec::with_capacity(self.config.sources.len());
        for source in &self.config.sources {
            let events = fetch_events(self.backend, &source.id, window).await?;
            tracing::info!(source = source.label(), events = events.len(), "fetched source");
            fetched.push(events);
        }

        let target = &self.config.target;
        let existing = fetch_events(self.backend, &target.id, window).await?;
        tracing::info!(target = %target.name, events = existing.len(), "fetched target");

        let mut merged: EventStream<'_> = Box::new(std::iter::empty());
        for (pipeline, events) in pipelines.iter().zip(fetched) {
            merged = Box::new(merged.chain(pipeline.apply(Box::new(events.into_iter()))));
        }

        reconcile(
            merged,
            existing,
            sequence_now(),
            self.config.on_uid_collision,
        )
    }

    /// Compute the batch for `window` and write it to the target calendar.
    pub async fn sync(&self, window: &SyncWindow) -> PolycalResult<SyncOutcome> {
        let batch = self.plan(window).await?;
        let report = apply_batch(self.backend, &self.config.target.id, &batch).await;
        Ok(SyncOutcome { batch, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::backend::{BackendAttendee, BackendEvent, EventStatus, Transparency};
    use crate::error::PolycalError;
    use crate::event::{EventTime, RsvpStatus};
    use chrono::{TimeZone, Utc};

    const WORK: &str = "alice@example.com";
    const FAMILY: &str = "family123@group.calendar.google.com";
    const TARGET: &str = "merged@example.com";

    const CONFIG: &str = r#"
        [[sources]]
        id = "alice@example.com"
        name = "Work"
        transforms = [
            { type = "Merge", kwargs = { epsilon = "5m" } },
        ]

        [[sources]]
        id = "family123@group.calendar.google.com"
        transforms = [
            { type = "ReplaceTitle", kwargs = { pattern = "^Dentist$", repl = "Busy" } },
        ]

        [target]
        id = "merged@example.com"
        name = "Everything"
    "#;

    fn record(
        id: &str,
        title: &str,
        (month, day, hour, minute): (u32, u32, u32, u32),
        minutes: i64,
    ) -> BackendEvent {
        let start = Utc.with_ymd_and_hms(2025, month, day, hour, minute, 0).unwrap();
        BackendEvent {
            id: id.to_string(),
            ical_uid: Some(format!("{}@google.com", id)),
            sequence: 0,
            summary: Some(title.to_string()),
            description: None,
            location: None,
            start: EventTime::DateTime(start),
            end: EventTime::DateTime(start + chrono::TimeDelta::minutes(minutes)),
            status: EventStatus::Confirmed,
            transparency: Transparency::Opaque,
            event_type: None,
            attendees: vec![],
        }
    }

    fn seeded_backend() -> MemoryBackend {
        let mut lunch = record("w3", "Lunch", (3, 20, 12, 0), 60);
        lunch.attendees.push(BackendAttendee {
            email: WORK.to_string(),
            response_status: Some(RsvpStatus::Declined),
        });

        let backend = MemoryBackend::with_events(
            WORK,
            vec![
                record("w1", "Standup", (3, 20, 9, 0), 60),
                record("w2", "Standup", (3, 20, 10, 3), 30),
                lunch,
                record("w4", "Review", (3, 20, 14, 0), 60),
            ],
        );
        backend.insert(FAMILY, vec![record("h1", "Dentist", (3, 21, 16, 0), 60)]);

        let mut stale = record("t1", "Old", (3, 2, 8, 0), 30);
        stale.ical_uid = Some("stale@polycal".to_string());
        let mut next_month = record("t2", "Later", (4, 2, 8, 0), 30);
        next_month.ical_uid = Some("later@polycal".to_string());
        backend.insert(TARGET, vec![stale, next_month]);
        backend
    }

    fn window() -> SyncWindow {
        SyncWindow::for_month(2025, 3).unwrap()
    }

    #[tokio::test]
    async fn test_plan() {
        let config = PolycalConfig::from_toml(CONFIG).unwrap();
        let backend = seeded_backend();

        let batch = Processor::new(&config, &backend).plan(&window()).await.unwrap();

        let changed: Vec<(&str, Option<&str>)> = batch
            .changed
            .iter()
            .map(|e| (e.uid.as_str(), e.title.as_deref()))
            .collect();
        assert_eq!(
            changed,
            vec![
                ("w1@polycal", Some("Standup")),
                ("w4@polycal", Some("Review")),
                ("h1@polycal", Some("Busy")),
            ]
        );
        let standup = &batch.changed[0];
        assert_eq!(
            standup.end,
            EventTime::DateTime(Utc.with_ymd_and_hms(2025, 3, 20, 10, 33, 0).unwrap())
        );
        assert_eq!(standup.source_ids, vec!["w1", "w2"]);

        let tombstones: Vec<&str> = batch.tombstones.iter().map(|e| e.uid.as_str()).collect();
        assert_eq!(tombstones, vec!["stale@polycal"]);
        assert_eq!(backend.events(TARGET).len(), 2);
    }

    #[tokio::test]
    async fn test_sync_then_resync_is_empty() {
        let config = PolycalConfig::from_toml(CONFIG).unwrap();
        let backend = seeded_backend();
        let processor = Processor::new(&config, &backend);

        let outcome = processor.sync(&window()).await.unwrap();
        assert!(outcome.report.is_success());
        assert_eq!((outcome.report.imported, outcome.report.deleted), (3, 1));

        let mut uids: Vec<String> = backend
            .events(TARGET)
            .into_iter()
            .filter_map(|e| e.ical_uid)
            .collect();
        uids.sort();
        assert_eq!(
            uids,
            vec!["h1@polycal", "later@polycal", "w1@polycal", "w4@polycal"]
        );

        let again = processor.plan(&window()).await.unwrap();
        assert!(again.is_empty(), "unexpected changes: {:?}", again);
    }

    #[tokio::test]
    async fn test_invalid_transform_fails_before_fetch() {
        let config = PolycalConfig::from_toml(
            r#"
            [[sources]]
            id = "alice@example.com"
            transforms = [{ type = "Merge" }]

            [[sources]]
            id = "bob@example.com"
            transforms = [{ type = "SkipByDuration", kwargs = { min_duration = "1.5h" } }]

            [target]
            id = "merged@example.com"
            name = "Everything"
            "#,
        )
        .unwrap();
        let backend = seeded_backend();

        let result = Processor::new(&config, &backend).plan(&window()).await;

        assert!(matches!(result, Err(PolycalError::InvalidDuration(_))));
        assert_eq!(backend.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_sync_deletes_every_copy_of_a_stale_uid() {
        let config = PolycalConfig::from_toml(
            r#"
            sources = []

            [target]
            id = "merged@example.com"
            name = "Everything"
            "#,
        )
        .unwrap();
        let mut first = record("d1", "Old", (3, 2, 8, 0), 30);
        first.ical_uid = Some("dup@polycal".to_string());
        let mut second = record("d2", "Old", (3, 2, 8, 0), 30);
        second.ical_uid = Some("dup@polycal".to_string());
        let backend = MemoryBackend::with_events(TARGET, vec![first, second]);

        let outcome = Processor::new(&config, &backend).sync(&window()).await.unwrap();

        assert_eq!(outcome.batch.tombstones.len(), 1);
        assert!(outcome.report.is_success());
        assert_eq!(outcome.report.deleted, 2);
        assert!(backend.events(TARGET).is_empty());
    }

    #[tokio::test]
    async fn test_cross_source_collision_policy() {
        let config = PolycalConfig::from_toml(
            r#"
            on_uid_collision = "error"

            [[sources]]
            id = "alice@example.com"

            [[sources]]
            id = "alice@example.com"

            [target]
            id = "merged@example.com"
            name = "Everything"
            "#,
        )
        .unwrap();
        let backend = seeded_backend();

        let result = Processor::new(&config, &backend).plan(&window()).await;

        assert!(matches!(result, Err(PolycalError::UidCollision(_))));
    }
}
